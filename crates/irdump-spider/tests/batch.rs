mod common;

use common::{scratch, FakeWeb};
use irdump_spider::batch::BatchRunner;
use irdump_spider::ledger::LEDGER_FILE;
use irdump_spider::roster::{Company, Roster};
use irdump_spider::scrape::Spider;

#[tokio::test]
async fn one_company_failing_does_not_stop_the_batch() {
    let root = scratch("batch");

    // corrupt ledger for the first company
    let corrupt = Company::new("Broken Ledger", None, "https://broken.example.com/");
    std::fs::create_dir_all(corrupt.dir(&root)).unwrap();
    std::fs::write(corrupt.dir(&root).join(LEDGER_FILE), "not json").unwrap();

    let crashing = Company::new("Crashing Co", None, "https://crash.example.com/");
    let offline = Company::new("Offline Inc", Some("OFF"), "https://offline.example.com/");
    let empty = Company::new("Empty Page", None, "https://empty.example.com/");
    let healthy = Company::new("Healthy Holdings", Some("HLT"), "https://ir.healthy.example.com/");

    let web = FakeWeb::default();
    web.page("https://broken.example.com/", r#"<a href="x.pdf">x</a>"#)
        .page("https://empty.example.com/", "<p>nothing here</p>")
        .page("https://ir.healthy.example.com/", r#"<a href="10-k.pdf">10-K</a>"#)
        .file("https://ir.healthy.example.com/10-k.pdf", b"10-k")
        .panic_on("https://crash.example.com/");

    let roster = Roster::new(vec![
        corrupt,
        crashing,
        offline,
        empty,
        healthy.clone(),
    ]);
    let runner = BatchRunner::new(roster, Spider::new(web.clone(), &root));

    let report = runner.run().await.unwrap();
    assert_eq!(report.completed, 1);
    assert_eq!(report.page_unavailable, 1);
    assert_eq!(report.no_links, 1);
    assert_eq!(report.downloaded, 1);

    let failed: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(failed, vec!["Broken Ledger", "Crashing Co"]);
    assert!(report.failed[1].1.contains("simulated crash"));

    // the last company in the roster was still scraped
    assert!(healthy.dir(&root).join("10-k.pdf").exists());

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn batch_creates_missing_data_root() {
    let root = scratch("fresh-root").join("nested").join("data");
    let web = FakeWeb::default();
    let roster = Roster::new(vec![Company::new("Solo", None, "https://solo.example.com/")]);

    let report = BatchRunner::new(roster, Spider::new(web, &root))
        .run()
        .await
        .unwrap();

    assert_eq!(report.page_unavailable, 1);
    assert!(root.join("solo").is_dir());
}
