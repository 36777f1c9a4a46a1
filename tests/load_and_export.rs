//! End-to-end scenarios: load the record through the controller against a
//! mock registry and a file-backed cache, then export it.

use chrono::{DateTime, Duration, Utc};
use httpmock::prelude::*;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

use cnpjview::app::{App, LoadState, RecordSource};
use cnpjview::cache::{CompanyCache, FileStore};
use cnpjview::data::RegistryClient;
use cnpjview::export::{LaunchError, LinkLauncher};

const CACHE_FILE: &str = "dadosCNPJ_30721151000108.json";

#[derive(Clone, Default)]
struct RecordingLauncher {
    opened: Rc<RefCell<Vec<String>>>,
}

impl LinkLauncher for RecordingLauncher {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

fn create_app(base_url: &str, cache_dir: &TempDir, output_dir: &TempDir) -> (App, RecordingLauncher) {
    let launcher = RecordingLauncher::default();
    let app = App::with_parts(
        RegistryClient::with_base_url(base_url),
        Some(CompanyCache::new(Box::new(FileStore::with_dir(
            cache_dir.path().to_path_buf(),
        )))),
        Box::new(launcher.clone()),
        output_dir.path().to_path_buf(),
    );
    (app, launcher)
}

fn acme_payload() -> serde_json::Value {
    serde_json::json!({
        "razao_social": "ACME LTDA",
        "nome_fantasia": "ACME",
        "cnpj": "30721151000108",
        "descricao_situacao_cadastral": "ATIVA",
        "data_inicio_atividade": "2018-06-05",
        "natureza_juridica": "Sociedade Empresária Limitada",
        "cnae_fiscal_descricao": "Desenvolvimento de programas de computador sob encomenda",
        "logradouro": "RUA DAS FLORES",
        "numero": "100",
        "complemento": "",
        "bairro": "CENTRO",
        "municipio": "SAO PAULO",
        "uf": "SP",
        "cep": "01001000"
    })
}

#[tokio::test]
async fn test_successful_fetch_is_displayed_and_cached_for_a_day() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RegistryClient::record_path());
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(acme_payload());
        })
        .await;

    let cache_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let (mut app, _) = create_app(&server.base_url(), &cache_dir, &output_dir);

    let before = Utc::now();
    app.load().await;

    assert_eq!(app.state, LoadState::Ready);
    let fields = app.fields().unwrap();
    assert_eq!(fields[0].label, "Razão Social");
    assert_eq!(fields[0].value, "ACME LTDA");

    let raw = fs::read_to_string(cache_dir.path().join(CACHE_FILE)).expect("Entry should be cached");
    let entry: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(entry["dados"]["razao_social"], "ACME LTDA");

    let expires: DateTime<Utc> = entry["validade"].as_str().unwrap().parse().unwrap();
    let expected = before + Duration::hours(24);
    assert!((expires - expected).num_seconds().abs() < 60);
}

#[tokio::test]
async fn test_server_error_shows_error_and_writes_no_cache() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RegistryClient::record_path());
            then.status(500);
        })
        .await;

    let cache_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let (mut app, _) = create_app(&server.base_url(), &cache_dir, &output_dir);

    app.load().await;

    match &app.state {
        LoadState::Failed(message) => assert!(message.contains("Erro")),
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(!cache_dir.path().join(CACHE_FILE).exists());
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(RegistryClient::record_path());
            then.status(200).json_body(acme_payload());
        })
        .await;

    let cache_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let (mut first, _) = create_app(&server.base_url(), &cache_dir, &output_dir);
    first.load().await;
    assert_eq!(first.source, Some(RecordSource::Registry));

    let (mut second, _) = create_app(&server.base_url(), &cache_dir, &output_dir);
    second.load().await;

    assert_eq!(second.source, Some(RecordSource::Cache));
    assert_eq!(second.record, first.record);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_expired_cache_is_replaced_by_fresh_fetch() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(RegistryClient::record_path());
            then.status(200).json_body(acme_payload());
        })
        .await;

    let cache_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    fs::write(
        cache_dir.path().join(CACHE_FILE),
        r#"{"dados": {"razao_social": "OLD LTDA", "cnpj": "30721151000108"}, "validade": "2000-01-01T00:00:00.000Z"}"#,
    )
    .unwrap();

    let (mut app, _) = create_app(&server.base_url(), &cache_dir, &output_dir);
    app.load().await;

    mock.assert_hits_async(1).await;
    assert_eq!(app.source, Some(RecordSource::Registry));
    assert_eq!(app.record.unwrap().razao_social.as_deref(), Some("ACME LTDA"));
}

#[tokio::test]
async fn test_exports_after_load() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(RegistryClient::record_path());
            then.status(200).json_body(acme_payload());
        })
        .await;

    let cache_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    let (mut app, launcher) = create_app(&server.base_url(), &cache_dir, &output_dir);
    app.load().await;

    let path = app.export_pdf().expect("PDF export should succeed");
    assert_eq!(path, output_dir.path().join("dados_cnpj.pdf"));
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));

    let link = app.share().expect("Share should succeed");
    assert!(link.starts_with("https://wa.me/?text=Consulta%20CNPJ%3A"));
    assert!(link.contains("ACME%20LTDA"));
    assert_eq!(launcher.opened.borrow().as_slice(), &[link]);
}
