use image_alchemist::{
    ai::{ImageGenerationService, MockImageGenerationClient, MockPromptClient, PromptService},
    app::{App, AppServices},
    aspect::AspectRatio,
    gallery::{Gallery, STORAGE_KEY},
    models::{BatchProgress, Config},
    storage::{FileStorage, MemoryStorage, RecordStorage},
    Error,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_app(image_gen: MockImageGenerationClient, storage: MemoryStorage) -> App {
    App::with_services(
        AppServices {
            image_gen: Box::new(image_gen),
            prompt: Box::new(
                MockPromptClient::new()
                    .with_enhancement("A lighthouse in a storm, oil on canvas", None),
            ),
            storage: Box::new(storage),
        },
        4,
    )
}

#[tokio::test]
async fn test_full_workflow_with_mocks() {
    let storage = MemoryStorage::new();
    let mut app = mock_app(MockImageGenerationClient::new(), storage.clone());

    let enhanced = app.enhance_prompt("a lighthouse").await.unwrap();
    assert_eq!(
        enhanced.enhanced_prompt,
        "A lighthouse in a storm, oil on canvas"
    );

    let prompt = app.sanitize_prompt(&enhanced.enhanced_prompt).await;
    let single = app
        .generate_single(&prompt, AspectRatio::Portrait)
        .await
        .unwrap();

    let mut progress = Vec::new();
    let outcome = app
        .generate_batch(&prompt, AspectRatio::Portrait, |p: BatchProgress| {
            progress.push(p.current)
        })
        .await
        .unwrap();

    assert_eq!(outcome.images.len(), 4);
    assert!(outcome.warning().is_none());
    assert_eq!(progress, vec![0, 1, 1, 2, 2, 3, 3, 4]);

    // Batch goes in front of the earlier single image.
    assert_eq!(app.gallery().len(), 5);
    assert_eq!(app.gallery().images()[4].id, single.id);

    let restarted = mock_app(MockImageGenerationClient::new(), storage);
    assert_eq!(restarted.gallery().images(), app.gallery().images());
}

#[tokio::test]
async fn test_partial_batch_reports_shortfall() {
    let image_gen = MockImageGenerationClient::new()
        .with_image("https://img.test/1.png")
        .with_failure("Rate limit exceeded")
        .with_failure("Rate limit exceeded")
        .with_image("https://img.test/4.png");
    let mut app = mock_app(image_gen, MemoryStorage::new());

    let outcome = app
        .generate_batch("a lighthouse", AspectRatio::Square, |_| {})
        .await
        .unwrap();

    assert_eq!(
        outcome.warning().as_deref(),
        Some("Generated 2 out of 4 images. Some generations failed.")
    );
    let urls: Vec<&str> = app
        .gallery()
        .images()
        .iter()
        .map(|image| image.url.as_str())
        .collect();
    assert_eq!(urls, vec!["https://img.test/1.png", "https://img.test/4.png"]);
}

#[tokio::test]
async fn test_failed_batch_keeps_prior_gallery() {
    let storage = MemoryStorage::new();
    let image_gen = MockImageGenerationClient::new()
        .with_image("https://img.test/keep.png")
        .with_failure("down")
        .with_failure("down")
        .with_failure("down")
        .with_failure("down");
    let mut app = mock_app(image_gen, storage.clone());

    app.generate_single("a lighthouse", AspectRatio::Square)
        .await
        .unwrap();
    let before = storage.read(STORAGE_KEY).unwrap();

    let err = app
        .generate_batch("a lighthouse", AspectRatio::Square, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AggregateFailure(ref reasons) if reasons.len() == 4));

    assert_eq!(app.gallery().len(), 1);
    assert_eq!(storage.read(STORAGE_KEY).unwrap(), before);
}

#[tokio::test]
async fn test_clear_then_fresh_start_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        gallery_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    {
        let mut gallery = Gallery::new(Box::new(FileStorage::new(&config.gallery_dir)));
        let image = MockImageGenerationClient::new()
            .generate_image("a lighthouse", AspectRatio::Landscape)
            .await
            .unwrap();
        gallery.append(vec![image]).unwrap();
    }

    let mut app = App::new(&config);
    assert_eq!(app.gallery().len(), 1);

    app.clear_gallery().unwrap();
    assert!(app.gallery().is_empty());
    assert!(!FileStorage::new(dir.path()).path_for(STORAGE_KEY).exists());

    let fresh = App::new(&config);
    assert!(fresh.gallery().is_empty());
}

#[tokio::test]
async fn test_app_from_config_without_openai_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        openai_base_url: server.uri(),
        gallery_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let mut app = App::new(&config);

    let err = app
        .generate_single("a lighthouse", AspectRatio::Square)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn test_app_generates_against_remote_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "url": "https://images.test/lighthouse.png",
                "revised_prompt": "A lone lighthouse on a cliff at dusk"
            }]
        })))
        .expect(4)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        openai_api_key: Some("sk-test".to_string()),
        openai_base_url: server.uri(),
        gallery_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let mut app = App::new(&config);

    let outcome = app
        .generate_batch("a lighthouse", AspectRatio::Widescreen, |_| {})
        .await
        .unwrap();
    assert_eq!(outcome.images.len(), 4);
    assert!(outcome
        .images
        .iter()
        .all(|image| image.prompt == "A lone lighthouse on a cliff at dusk"));

    let reopened = Gallery::open(Box::new(FileStorage::new(dir.path())));
    assert_eq!(reopened.len(), 4);
}

#[tokio::test]
async fn test_sanitize_survives_remote_outage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = image_alchemist::ai::OpenRouterPromptClient::new(
        Some("or-key".to_string()),
        "test/model".to_string(),
    )
    .with_base_url(server.uri());

    assert_eq!(client.sanitize("a lighthouse").await, "a lighthouse");
}
