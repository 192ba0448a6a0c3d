mod common;

use std::sync::Arc;
use std::time::Duration;

use scraps_ogp::render::page::PageShell;
use scraps_ogp::{CardState, FailureReason, FetchError, LinkTarget, OgpMetadata, OgpPage, OgpProvider};

const TIMEOUT: Duration = Duration::from_secs(5);

fn autolink(url: &str) -> String {
    format!(r#"<p><a href="{url}">{url}</a></p>"#)
}

#[tokio::test]
async fn autolink_reference_page_renders_cards() {
    let server = common::spawn_test_server().await;
    let html = format!(
        "<h2>Autolink</h2>\n{}\n{}",
        autolink(&server.url("/boykush/scraps")),
        autolink(&server.url("/missing")),
    );
    let provider: Arc<dyn OgpProvider> = Arc::new(common::direct_client(TIMEOUT));

    let page = OgpPage::mount_html(&html, provider, TIMEOUT);
    assert_eq!(page.cards().len(), 2);

    let settled = tokio::time::timeout(TIMEOUT, page.settle())
        .await
        .expect("page settles within the bounded wait");
    assert!(matches!(settled[0].1, CardState::Loaded(_)));
    assert_eq!(settled[1].1, CardState::Failed(FailureReason::InvalidResponse));

    let rendered = page
        .render(&PageShell::new("Scraps Doc").with_title("Autolink"))
        .into_string();
    assert!(rendered.contains("<title>Autolink | Scraps Doc</title>"));
    assert!(rendered.contains("<h2>Autolink</h2>"));
    assert!(rendered.contains(common::GITHUB_TITLE));
    assert!(rendered.contains(r#"data-reason="invalid_response""#));
    assert!(!rendered.contains("ogp-placeholder"));
    assert!(!rendered.contains("aria-busy"));
}

#[tokio::test]
async fn one_failing_card_leaves_others_untouched() {
    let good = "https://good.example.com/";
    let bad = "https://bad.example.com/";
    let provider = Arc::new(
        common::StubProvider::new(Duration::from_millis(20))
            .respond(good, Ok(OgpMetadata::new("Good", "fine")))
            .respond(bad, Err(FetchError::Network("connection reset".into()))),
    );

    let html = format!("{}{}", autolink(bad), autolink(good));
    let page = OgpPage::mount_html(&html, provider.clone(), TIMEOUT);
    page.settle().await;

    let good = LinkTarget::parse(good).unwrap();
    let bad = LinkTarget::parse(bad).unwrap();
    assert_eq!(
        page.state_of(&good),
        Some(CardState::Loaded(OgpMetadata::new("Good", "fine")))
    );
    assert_eq!(
        page.state_of(&bad),
        Some(CardState::Failed(FailureReason::Network))
    );
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn cards_render_loading_while_in_flight() {
    let provider = Arc::new(
        common::StubProvider::new(Duration::from_millis(200))
            .respond("https://example.com/", Ok(OgpMetadata::new("Example", ""))),
    );
    let page = OgpPage::mount_html(&autolink("https://example.com/"), provider, TIMEOUT);

    let rendered = page.render(&PageShell::new("Scraps Doc")).into_string();
    assert!(rendered.contains(r#"data-state="loading""#));
    assert!(rendered.contains(r#"<div class="ogp-title ogp-placeholder">Loading...</div>"#));

    page.settle().await;
    let rendered = page.render(&PageShell::new("Scraps Doc")).into_string();
    assert!(rendered.contains(r#"<div class="ogp-title">Example</div>"#));
}

#[tokio::test]
async fn unmount_stops_pending_cards() {
    let provider = Arc::new(
        common::StubProvider::new(Duration::from_millis(100))
            .respond("https://example.com/", Ok(OgpMetadata::new("Example", ""))),
    );
    let page = OgpPage::mount_html(&autolink("https://example.com/"), provider, TIMEOUT);
    let mut rx = page.cards()[0].subscribe();

    page.unmount();

    let last = tokio::time::timeout(Duration::from_secs(1), async {
        while rx.changed().await.is_ok() {}
        rx.borrow().clone()
    })
    .await
    .expect("fetch task exits after unmount");
    assert_eq!(last, CardState::Loading);
}
