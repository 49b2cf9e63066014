//! Model cache keyed by model identifier, backed by a model hub and ONNX Runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use async_trait::async_trait;
use ort::session::Session;
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell};

use crate::types::{OpenPowerError, OpenPowerResult};

/// Default model hub endpoint.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Hub path of the ONNX export inside a model repository.
const MODEL_FILE: &str = "onnx/model.onnx";

/// Hub path of the tokenizer definition inside a model repository.
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Fetches a model and its tokenizer into a cache directory.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    type Model: Send + Sync;
    type Tokenizer: Send + Sync;

    /// Load `model_id`, using `cache_dir` (already scoped to the model) for files.
    async fn load(
        &self,
        model_id: &str,
        cache_dir: &Path,
    ) -> OpenPowerResult<(Self::Model, Self::Tokenizer)>;
}

type Loaded<L> = (
    Arc<<L as ModelLoader>::Model>,
    Arc<<L as ModelLoader>::Tokenizer>,
);

type Slot<L> = Arc<OnceCell<Loaded<L>>>;

/// Check that `model_id` has the hub shape `name` or `org/name`.
///
/// Each segment is non-empty, is not `.` or `..`, and holds only ASCII
/// alphanumerics, `-`, `_` and `.`, so the id always stays below the cache root.
pub fn validate_model_id(model_id: &str) -> OpenPowerResult<()> {
    let segments: Vec<&str> = model_id.split('/').collect();
    let valid_segment = |s: &&str| {
        !s.is_empty()
            && *s != "."
            && *s != ".."
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };

    if segments.len() > 2 || !segments.iter().all(valid_segment) {
        return Err(OpenPowerError::InvalidModelId(model_id.to_string()));
    }
    Ok(())
}

/// Loads each model at most once and hands out shared handles afterwards.
pub struct ModelManager<L: ModelLoader> {
    cache_dir: PathBuf,
    loader: L,
    slots: Mutex<HashMap<String, Slot<L>>>,
}

impl<L: ModelLoader> ModelManager<L> {
    /// Create a manager rooted at `cache_dir`, creating the directory if needed.
    pub fn new(cache_dir: impl Into<PathBuf>, loader: L) -> OpenPowerResult<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            OpenPowerError::Io(std::io::Error::other(format!(
                "Failed to create model cache {}: {e}",
                cache_dir.display()
            )))
        })?;

        Ok(Self {
            cache_dir,
            loader,
            slots: Mutex::new(HashMap::new()),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Return the cached model and tokenizer, loading them on first use.
    ///
    /// Concurrent first requests for one id share a single load. The map lock
    /// is only held to find the slot, so loads of other ids are not blocked.
    pub async fn get_or_load(&self, model_id: &str) -> OpenPowerResult<Loaded<L>> {
        validate_model_id(model_id)?;

        let slot = self
            .slots
            .lock()
            .await
            .entry(model_id.to_string())
            .or_default()
            .clone();

        if slot.initialized() {
            tracing::debug!("Model cache hit: {model_id}");
        }

        let (model, tokenizer) = slot
            .get_or_try_init(|| async {
                let model_dir = self.cache_dir.join(model_id);
                tracing::info!("Loading model {model_id} into {}", model_dir.display());

                let (model, tokenizer) = self.loader.load(model_id, &model_dir).await?;
                tracing::info!("Model {model_id} loaded");
                Ok::<_, OpenPowerError>((Arc::new(model), Arc::new(tokenizer)))
            })
            .await?;

        Ok((model.clone(), tokenizer.clone()))
    }

    pub async fn is_loaded(&self, model_id: &str) -> bool {
        self.slots
            .lock()
            .await
            .get(model_id)
            .is_some_and(|slot| slot.initialized())
    }

    /// Identifiers of every loaded model, sorted.
    pub async fn list_models(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .slots
            .lock()
            .await
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Drop every loaded handle. Files on disk are kept.
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}

/// ONNX Runtime session for a loaded model.
pub struct OnnxModel {
    path: PathBuf,
    session: StdMutex<Session>,
}

impl OnnxModel {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exclusive access to the session for inference.
    pub fn session(&self) -> OpenPowerResult<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|_| OpenPowerError::Model("ONNX session lock poisoned".to_string()))
    }
}

/// Parsed `tokenizer.json` definition.
#[derive(Debug, Clone)]
pub struct TokenizerSpec {
    pub path: PathBuf,
    pub definition: Value,
}

impl TokenizerSpec {
    pub fn from_file(path: &Path) -> OpenPowerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let definition: Value = serde_json::from_str(&raw)?;
        Ok(Self {
            path: path.to_path_buf(),
            definition,
        })
    }

    /// Number of entries in the base vocabulary plus added tokens.
    pub fn vocab_size(&self) -> usize {
        let base = match &self.definition["model"]["vocab"] {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        };
        let added = self.definition["added_tokens"]
            .as_array()
            .map(|tokens| tokens.len())
            .unwrap_or(0);
        base + added
    }
}

/// Downloads ONNX exports and tokenizers from a model hub.
pub struct HubLoader {
    client: reqwest::Client,
    endpoint: String,
}

impl HubLoader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    fn file_url(&self, model_id: &str, file: &str) -> String {
        format!("{}/{model_id}/resolve/main/{file}", self.endpoint)
    }

    async fn fetch(&self, model_id: &str, file: &str, dest: &Path) -> OpenPowerResult<()> {
        if dest.exists() {
            tracing::debug!("Using cached {}", dest.display());
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let url = self.file_url(model_id, file);
        tracing::info!("Downloading {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OpenPowerError::Model(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(OpenPowerError::Model(format!(
                "Failed to fetch {url}: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| OpenPowerError::Model(format!("Failed to read {url}: {e}")))?;

        // An interrupted download must never look like a cached file.
        let partial = dest.with_extension("partial");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, dest).await?;
        Ok(())
    }
}

impl Default for HubLoader {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_ENDPOINT)
    }
}

#[async_trait]
impl ModelLoader for HubLoader {
    type Model = OnnxModel;
    type Tokenizer = TokenizerSpec;

    async fn load(
        &self,
        model_id: &str,
        cache_dir: &Path,
    ) -> OpenPowerResult<(OnnxModel, TokenizerSpec)> {
        let tokenizer_path = cache_dir.join(TOKENIZER_FILE);
        let model_path = cache_dir.join(MODEL_FILE);

        self.fetch(model_id, TOKENIZER_FILE, &tokenizer_path).await?;
        self.fetch(model_id, MODEL_FILE, &model_path).await?;

        let tokenizer = TokenizerSpec::from_file(&tokenizer_path)?;

        let path = model_path.clone();
        let session = tokio::task::spawn_blocking(move || {
            Session::builder()
                .and_then(|b| b.with_intra_threads(1))
                .and_then(|b| b.commit_from_file(&path))
                .map_err(|e| OpenPowerError::Model(format!("Failed to load ONNX model: {e}")))
        })
        .await
        .map_err(|e| OpenPowerError::Model(format!("Model loading task failed: {e}")))??;

        Ok((
            OnnxModel {
                path: model_path,
                session: StdMutex::new(session),
            },
            tokenizer,
        ))
    }
}
