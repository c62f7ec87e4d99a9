//! Shared harness for the functional scenarios.
//!
//! With `PETFRIENDS_EMAIL` and `PETFRIENDS_PASSWORD` set, scenarios run
//! against the live service (`PETFRIENDS_BASE_URL` overrides the host).
//! Otherwise a mock server is started on a random port, seeded with a test
//! account and a second account that owns one pet.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use mock_server::Seed;
use petfriends_core::{Credentials, PetFriends, Settings};
use tracing_subscriber::EnvFilter;

pub const MOCK_EMAIL: &str = "user@petfriends.test";
pub const MOCK_PASSWORD: &str = "secret";
pub const MOCK_STRANGER: &str = "stranger@petfriends.test";

pub struct TestEnv {
    pub pf: PetFriends,
    pub credentials: Credentials,
}

static ENV: OnceLock<TestEnv> = OnceLock::new();
static SERIAL: Mutex<()> = Mutex::new(());

/// The client shared by every scenario in this binary.
pub fn env() -> &'static TestEnv {
    ENV.get_or_init(init)
}

/// Scenarios share one account, so they run one at a time.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn image(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("images")
        .join(name)
}

pub fn assert_error_status(status: u16) {
    assert!(status >= 400, "expected a 4xx/5xx status, got {status}");
}

fn init() -> TestEnv {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    if let Some(settings) = Settings::from_env() {
        tracing::info!(base_url = %settings.base_url, "running against live service");
        return TestEnv {
            pf: PetFriends::new(&settings.base_url),
            credentials: settings.credentials,
        };
    }

    let base_url = spawn_mock_server();
    TestEnv {
        pf: PetFriends::new(&base_url),
        credentials: Credentials::new(MOCK_EMAIL, MOCK_PASSWORD),
    }
}

fn spawn_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let seed = Seed::new()
        .with_account(MOCK_EMAIL, MOCK_PASSWORD)
        .with_account(MOCK_STRANGER, "stranger")
        .with_pet(MOCK_STRANGER, "Шарик", "пёс", "5");

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, seed).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}
