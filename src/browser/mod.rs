//! 浏览器层（基础设施）
//!
//! 持有唯一的 Browser 资源，只暴露"取回某 URL 上指定容器的渲染后
//! innerHTML"这一项能力。每次抓取使用独立的页面，互不干扰；
//! 所有任务结束之前浏览器不会被关闭。

mod driver;

pub use driver::BrowserDriver;
