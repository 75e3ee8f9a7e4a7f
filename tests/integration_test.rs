use auto_apply::browser::open_session;
use auto_apply::config::Config;
use auto_apply::infrastructure::ChromiumSurface;
use auto_apply::models::SearchQuery;
use auto_apply::services::ListingScanner;
use auto_apply::utils::logging;
use auto_apply::PageSurface;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_session() {
    let config = Config::load().expect("加载配置失败");

    let result = open_session(&config.browser).await;
    assert!(result.is_ok(), "应该能够打开浏览器会话");

    let (session, _page) = result.unwrap();
    session.close().await;
}

#[tokio::test]
#[ignore]
async fn test_scan_first_results_page() {
    // 需要已登录的浏览器：设置 BROWSER_DEBUG_PORT 连接到自己的 Chrome
    let _ = logging::init("debug", "integration_test.log");
    let config = Config::load().expect("加载配置失败");

    let (session, page) = open_session(&config.browser).await.expect("打开浏览器失败");
    let surface = ChromiumSurface::new(page, config.timings.poll_interval());

    let url = SearchQuery::default()
        .page_url(&config.portal.search_url, 0, config.portal.page_size)
        .expect("生成搜索 URL 失败");
    surface.navigate(&url).await.expect("打开搜索页失败");

    let listings = ListingScanner::new(&config)
        .scan(&surface)
        .await
        .expect("扫描职位失败");
    println!("找到 {} 个职位", listings.len());
    for listing in &listings {
        println!("#{} {}", listing.position, listing.details);
    }

    drop(surface);
    session.close().await;
}
