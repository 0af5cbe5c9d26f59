//! Test server harness.

use flashquery::embedding::{SentenceEmbedder, ToxicityClassifier};
use flashquery::evaluation::{RecordingSink, ReferenceDictionary};
use flashquery::gateway::{HandlerState, create_router_with_state};
use flashquery::providers::{MockGenerator, MockSearch};
use flashquery::service::FlashQuery;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub struct TestServerConfig {
    pub generator: MockGenerator,
    pub search: MockSearch,
    pub references: ReferenceDictionary,
    pub score_threshold: f64,
    pub context_prefix_chars: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            generator: MockGenerator::replying("mock answer"),
            search: MockSearch::text(
                "Rust is a systems programming language focused on safety. It was first released in 2015.",
            ),
            references: ReferenceDictionary::new(),
            score_threshold: flashquery::DEFAULT_SCORE_THRESHOLD,
            context_prefix_chars: flashquery::DEFAULT_CONTEXT_PREFIX_CHARS,
        }
    }
}

impl TestServerConfig {
    pub fn with_generator(mut self, generator: MockGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_search(mut self, search: MockSearch) -> Self {
        self.search = search;
        self
    }

    pub fn with_references(mut self, references: ReferenceDictionary) -> Self {
        self.references = references;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub generator: Arc<MockGenerator>,
    pub search: Arc<MockSearch>,
    pub sink: Arc<RecordingSink>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Builds a service over mock providers, the stub embedder and the stub classifier.
pub fn mock_service(
    generator: Arc<MockGenerator>,
    search: Arc<MockSearch>,
    sink: Arc<RecordingSink>,
) -> FlashQuery {
    FlashQuery::new(
        generator,
        search,
        Arc::new(SentenceEmbedder::stub()),
        Arc::new(ToxicityClassifier::stub()),
        sink,
    )
}

/// Spawns a server on an ephemeral port with every external dependency mocked.
///
/// | Component  | Used here                          |
/// |------------|------------------------------------|
/// | Generation | `MockGenerator`                    |
/// | Search     | `MockSearch`                       |
/// | Embedder   | Stub `SentenceEmbedder`            |
/// | Toxicity   | Stub `ToxicityClassifier`          |
/// | Flags      | `RecordingSink` (inspectable)      |
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let generator = Arc::new(config.generator);
    let search = Arc::new(config.search);
    let sink = Arc::new(RecordingSink::new());

    let service = mock_service(generator.clone(), search.clone(), sink.clone())
        .with_references(config.references)
        .with_score_threshold(config.score_threshold)
        .with_context_prefix_chars(config.context_prefix_chars);

    let state = HandlerState::new(service, config.context_prefix_chars);
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        generator,
        search,
        sink,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
