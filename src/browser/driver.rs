//! 无头浏览器驱动

use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info};

use crate::error::{Result, ScrapeError};

/// 无头浏览器驱动
///
/// 职责：
/// - 持有唯一的 Browser 资源
/// - 为每次抓取创建独立页面，用完即关
/// - 不认识股票与报表，只处理 URL 和选择器
pub struct BrowserDriver {
    browser: Mutex<Browser>,
}

impl BrowserDriver {
    /// 启动无头浏览器
    pub async fn launch() -> Result<Self> {
        info!("🚀 启动无头浏览器...");

        let config = BrowserConfig::builder()
            .new_headless_mode()
            .args(vec![
                "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
                "--disable-setuid-sandbox",
                "--disable-gpu",
                "--disable-dev-shm-usage", // 防止共享内存不足
            ])
            .build()
            .map_err(ScrapeError::Driver)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            ScrapeError::Driver(e.to_string())
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        Ok(Self {
            browser: Mutex::new(browser),
        })
    }

    /// 取回渲染后页面上指定容器的 innerHTML
    ///
    /// 容器不存在或内容为空时返回 `NoData`（该来源常见且非瞬时，不重试）；
    /// 导航超过 `navigation_timeout` 返回 `Navigation`。
    pub async fn fetch_rendered_html(
        &self,
        url: &str,
        selector: &str,
        navigation_timeout: Duration,
    ) -> Result<String> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Driver(format!("创建页面失败: {e}")))?;

        let result = timeout(
            navigation_timeout,
            fetch_on_page(&page, url, selector),
        )
        .await;

        // 无论成败都关掉本次使用的页面
        let _ = page.close().await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: format!("导航超时 ({}s)", navigation_timeout.as_secs()),
            }),
        }
    }

    /// 关闭浏览器。必须在所有抓取任务结束之后调用。
    pub async fn shutdown(&self) {
        if let Err(e) = self.browser.lock().await.close().await {
            error!("关闭浏览器失败: {}", e);
        } else {
            debug!("浏览器已关闭");
        }
    }
}

async fn fetch_on_page(page: &Page, url: &str, selector: &str) -> Result<String> {
    debug!("导航到: {}", url);
    page.goto(url).await.map_err(|e| ScrapeError::Navigation {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    page.wait_for_navigation()
        .await
        .map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let js = format!(
        "(() => {{ const el = document.querySelector('{selector}'); return el ? el.innerHTML : null; }})()"
    );
    let result = page
        .evaluate(js)
        .await
        .map_err(|e| ScrapeError::Extract(e.to_string()))?;
    let inner_html: Option<String> = result
        .into_value()
        .map_err(|e| ScrapeError::Extract(e.to_string()))?;

    match inner_html {
        Some(html) if !html.trim().is_empty() => Ok(html),
        _ => Err(ScrapeError::NoData {
            url: url.to_string(),
        }),
    }
}
