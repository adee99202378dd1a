mod common;

use std::collections::HashSet;

use common::*;
use job_apply::orchestrator::Collaborators;
use job_apply::services::{
    ApplyConfirmer, AutoConfirm, Credentials, Ledger, MemoryLedgerStore, SearchQuery,
};
use job_apply::{App, AppError, Config, ProcessingStats, Resume, StrategyRegistry};

/// 站点：1234 已投递过；2 站内投递成功；3 站外；4 站内投递被拒（500）
fn job_site() -> FakeTransport {
    FakeTransport::new(|req| {
        let path = req.path();
        match path.as_str() {
            "/uas/login" => respond(200, LOGIN_PAGE),
            "/uas/login-submit" => respond(200, r#"{"status":"ok"}"#),
            "/jobs/searchRefresh" => respond(
                200,
                search_page(
                    4,
                    vec![
                        element(1234, true, "Acme Corp", None),
                        element(2, true, "Acme Corp", None),
                        element(3, false, "Globex", Some("some-ats-vendor.com")),
                        element(4, true, "Initech", None),
                    ],
                ),
            ),
            "/jobs/view/3" => respond(200, offsite_detail_page()),
            "/mupld/cappts" => respond(200, media_callback_body()),
            "/jobs/submitJobApplication" => match req.field("jobId") {
                Some("4") => respond(500, "{}"),
                _ => respond(200, "{}"),
            },
            p if p.starts_with("/jobs/view/applyFlow/") => respond(200, apply_flow_body()),
            _ => not_found(),
        }
    })
    .with_cookie("JSESSIONID", "\"ajax:42\"")
}

fn query() -> SearchQuery {
    SearchQuery {
        keywords: "rust".to_string(),
        location: "Berlin".to_string(),
        experience: Vec::new(),
    }
}

fn credentials() -> Credentials {
    Credentials::new(Some("me@example.com".into()), Some("hunter2".into()))
}

async fn start_app(
    config: Config,
    transport: &FakeTransport,
    store: &MemoryLedgerStore,
    confirmer: Box<dyn ApplyConfirmer>,
    resume: Option<Resume>,
    prompt: &ScriptedPrompt,
) -> App {
    let collaborators = Collaborators {
        transport: Box::new(transport.clone()),
        prompt,
        confirmer,
        ledger: Ledger::open(Box::new(store.clone())).unwrap(),
        registry: StrategyRegistry::standard(),
    };
    App::initialize_with(config, credentials(), resume, collaborators)
        .await
        .unwrap()
}

#[tokio::test]
async fn full_run_applies_records_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let report_path = config.report_file.clone();
    let output_path = config.output_log_file.clone();
    let transport = job_site();
    let store = MemoryLedgerStore::with_entries([1234]);
    let prompt = ScriptedPrompt::default();
    let resume = Resume::from_bytes("cv.pdf", b"%PDF resume".to_vec());

    let mut app = start_app(
        config,
        &transport,
        &store,
        Box::new(AutoConfirm),
        Some(resume),
        &prompt,
    )
    .await;
    let stats = app.run(query(), HashSet::new()).await.unwrap();

    assert_eq!(
        stats,
        ProcessingStats {
            total: 3,
            applied: 1,
            failed: 1,
            offsite: 1,
            refused: 0,
            skipped: 0,
        }
    );
    assert_eq!(store.entries(), vec![1234, 2, 3, 4]);
    assert!(app.ledger().contains(4));

    // 1234 从未被投递
    let submitted: Vec<String> = transport
        .requests_to("/jobs/submitJobApplication")
        .iter()
        .filter_map(|r| r.field("jobId").map(str::to_string))
        .collect();
    assert_eq!(submitted, vec!["2", "4"]);
    assert!(transport
        .requests()
        .iter()
        .all(|r| r.path() != "/jobs/view/applyFlow/1234"));

    let report = std::fs::read_to_string(report_path).unwrap();
    assert!(report.contains("职位 4"));
    assert!(report.contains("500"));
    let output = std::fs::read_to_string(output_path).unwrap();
    assert!(output.contains("投递日志"));
    assert!(output.contains("投递成功: 1/3"));
}

#[tokio::test]
async fn failed_attempts_can_stay_out_of_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        record_failed_attempts: false,
        ..test_config(dir.path())
    };
    let transport = job_site();
    let store = MemoryLedgerStore::with_entries([1234]);
    let prompt = ScriptedPrompt::default();

    let mut app = start_app(config, &transport, &store, Box::new(AutoConfirm), None, &prompt).await;
    let stats = app.run(query(), HashSet::new()).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(store.entries(), vec![1234, 2, 3]);
}

#[tokio::test]
async fn refused_jobs_are_recorded_only_with_store_no() {
    for (store_no, expected) in [(true, vec![2, 3, 4]), (false, vec![3, 4])] {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store_no,
            ..test_config(dir.path())
        };
        let transport = job_site();
        let store = MemoryLedgerStore::default();
        let prompt = ScriptedPrompt::default();

        let mut app = start_app(
            config,
            &transport,
            &store,
            Box::new(RefuseIds(vec![1234, 2])),
            None,
            &prompt,
        )
        .await;
        let stats = app.run(query(), HashSet::new()).await.unwrap();

        assert_eq!(stats.refused, 2);
        let mut entries = store.entries();
        if store_no {
            assert!(entries.contains(&1234));
            entries.retain(|id| *id != 1234);
        }
        assert_eq!(entries, expected, "store_no = {}", store_no);
        assert!(transport
            .requests_to("/jobs/submitJobApplication")
            .iter()
            .all(|r| r.field("jobId") != Some("2")));
    }
}

#[tokio::test]
async fn max_applications_stops_after_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        max_applications: Some(1),
        ..test_config(dir.path())
    };
    let transport = job_site();
    let store = MemoryLedgerStore::with_entries([1234]);
    let prompt = ScriptedPrompt::default();

    let mut app = start_app(config, &transport, &store, Box::new(AutoConfirm), None, &prompt).await;
    let stats = app.run(query(), HashSet::new()).await.unwrap();

    assert_eq!(stats.applied, 1);
    assert_eq!(stats.total, 1);
    assert_eq!(transport.requests_to("/jobs/submitJobApplication").len(), 1);
    assert_eq!(store.entries(), vec![1234, 2]);
}

#[tokio::test]
async fn blacklisted_company_is_never_offered() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let transport = job_site();
    let store = MemoryLedgerStore::with_entries([1234]);
    let prompt = ScriptedPrompt::default();

    let mut app = start_app(config, &transport, &store, Box::new(AutoConfirm), None, &prompt).await;
    let blacklist = HashSet::from(["Initech".to_string()]);
    let stats = app.run(query(), blacklist).await.unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.failed, 0);
    assert!(!app.ledger().contains(4));
}

#[tokio::test]
async fn unreachable_offsite_page_skips_the_job_without_recording() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let report_path = config.report_file.clone();
    let site = job_site();
    let transport = FakeTransport::new(move |req| {
        if req.path() == "/jobs/view/3" {
            return connection_reset(&req.url);
        }
        site.respond_to(req)
    })
    .with_cookie("JSESSIONID", "\"ajax:42\"");
    let store = MemoryLedgerStore::with_entries([1234]);
    let prompt = ScriptedPrompt::default();

    let mut app = start_app(config, &transport, &store, Box::new(AutoConfirm), None, &prompt).await;
    let stats = app.run(query(), HashSet::new()).await.unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.offsite, 0);
    assert_eq!(stats.applied, 1);
    assert!(!app.ledger().contains(3));
    assert_eq!(store.entries(), vec![1234, 2, 4]);

    let report = std::fs::read_to_string(report_path).unwrap();
    assert!(report.contains("职位 3"));
}

#[tokio::test]
async fn failed_login_stops_before_searching() {
    let dir = tempfile::tempdir().unwrap();
    let transport = FakeTransport::new(|req| match req.path().as_str() {
        "/uas/login" => respond(200, LOGIN_PAGE),
        "/uas/login-submit" => respond(200, r#"{"status":"fail"}"#),
        _ => not_found(),
    });
    let prompt = ScriptedPrompt::default();
    let collaborators = Collaborators {
        transport: Box::new(transport.clone()),
        prompt: &prompt,
        confirmer: Box::new(AutoConfirm),
        ledger: Ledger::open(Box::new(MemoryLedgerStore::default())).unwrap(),
        registry: StrategyRegistry::standard(),
    };

    let result =
        App::initialize_with(test_config(dir.path()), credentials(), None, collaborators).await;

    assert!(matches!(result, Err(AppError::Authentication { .. })));
    assert!(transport.requests_to("/jobs/searchRefresh").is_empty());
}

#[tokio::test]
async fn host_format_error_ends_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let transport = FakeTransport::new(|req| match req.path().as_str() {
        "/uas/login" => respond(200, LOGIN_PAGE),
        "/uas/login-submit" => respond(200, r#"{"status":"ok"}"#),
        "/jobs/searchRefresh" => respond(
            200,
            search_page(2, vec![element(2, true, "Acme Corp", None), element(5, true, "Acme Corp", None)]),
        ),
        "/mupld/cappts" => respond(200, "<html>no callback</html>"),
        p if p.starts_with("/jobs/view/applyFlow/") => respond(200, apply_flow_body()),
        _ => respond(200, "{}"),
    })
    .with_cookie("JSESSIONID", "ajax:1");
    let store = MemoryLedgerStore::default();
    let prompt = ScriptedPrompt::default();
    let resume = Resume::from_bytes("cv.pdf", b"x".to_vec());

    let mut app = start_app(
        test_config(dir.path()),
        &transport,
        &store,
        Box::new(AutoConfirm),
        Some(resume),
        &prompt,
    )
    .await;
    let err = app.run(query(), HashSet::new()).await.unwrap_err();

    assert!(matches!(err, AppError::ResumeReceiptParse { .. }));
    assert!(store.entries().is_empty());
    assert_eq!(transport.requests_to("/mupld/cappts").len(), 1);
}

#[test]
fn file_ledger_survives_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let transport = job_site();

    tokio_test::block_on(async {
        for _ in 0..2 {
            let prompt = ScriptedPrompt::default();
            let collaborators = Collaborators {
                transport: Box::new(transport.clone()),
                prompt: &prompt,
                confirmer: Box::new(AutoConfirm),
                ledger: Ledger::open(Box::new(job_apply::services::FileLedgerStore::new(
                    &config.ledger_path,
                )))
                .unwrap(),
                registry: StrategyRegistry::standard(),
            };
            let mut app = App::initialize_with(config.clone(), credentials(), None, collaborators)
                .await
                .unwrap();
            app.run(query(), HashSet::new()).await.unwrap();
        }
    });

    // 第二次运行时所有职位都已在记录中，只有第一次运行提交过
    let submits = transport.requests_to("/jobs/submitJobApplication");
    assert_eq!(submits.len(), 3);
    let ledger = std::fs::read_to_string(&config.ledger_path).unwrap();
    assert_eq!(ledger.lines().count(), 4);
}
