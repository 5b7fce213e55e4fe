use crate::client::token_text::TokenTextDecoder;
use crate::client::{find_stop_sequence, CompletionModel};
use async_trait::async_trait;
use easygguf_types::{Completion, GenerationError, GenerationParams, LoadError, ModelParams};
use llama_cpp_2::{
    context::params::LlamaContextParams,
    llama_backend::LlamaBackend,
    llama_batch::LlamaBatch,
    model::{params::LlamaModelParams, AddBos, LlamaModel, Special},
    sampling::LlamaSampler,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task;

/// Tokens considered by the repetition penalty
const PENALTY_LAST_N: i32 = 64;

/// In-process llama.cpp model loaded from a GGUF file
pub struct LocalLlamaModel {
    backend: Arc<LlamaBackend>,
    model: Arc<LlamaModel>,
    params: ModelParams,
}

impl LocalLlamaModel {
    /// Load the model weights. Loading runs on the blocking pool.
    pub async fn load(params: &ModelParams) -> Result<Self, LoadError> {
        if !params.model_path.exists() {
            return Err(LoadError::NotFound(params.model_path.clone()));
        }

        let params = params.clone();
        let path = params.model_path.clone();
        task::spawn_blocking(move || Self::load_blocking(params))
            .await
            .map_err(|e| LoadError::Invalid {
                path,
                reason: format!("loader task failed: {}", e),
            })?
    }

    fn load_blocking(params: ModelParams) -> Result<Self, LoadError> {
        let invalid = |reason: String| LoadError::Invalid {
            path: params.model_path.clone(),
            reason,
        };

        let mut backend = LlamaBackend::init().map_err(|e| invalid(format!("{:?}", e)))?;
        if !params.verbose {
            backend.void_logs();
        }

        let model = LlamaModel::load_from_file(&backend, &params.model_path, &LlamaModelParams::default())
            .map_err(|e| invalid(format!("{:?}", e)))?;

        Ok(Self {
            backend: Arc::new(backend),
            model: Arc::new(model),
            params,
        })
    }
}

#[async_trait]
impl CompletionModel for LocalLlamaModel {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, GenerationError> {
        let backend = Arc::clone(&self.backend);
        let model = Arc::clone(&self.model);
        let model_params = self.params.clone();
        let prompt = prompt.to_string();
        let params = params.clone();

        let text = task::spawn_blocking(move || {
            generate_blocking(&backend, &model, &model_params, &prompt, &params)
        })
        .await
        .map_err(|e| GenerationError::Inference(format!("inference task failed: {}", e)))??;

        Ok(Completion::from_text(text))
    }

    fn describe(&self) -> String {
        format!("llama.cpp (in-process) with {}", self.params.model_path.display())
    }
}

fn inference_error<E: std::fmt::Debug>(what: &str) -> impl Fn(E) -> GenerationError + '_ {
    move |e| GenerationError::Inference(format!("{}: {:?}", what, e))
}

/// Run one completion on a fresh context. The model is reused across calls.
fn generate_blocking(
    backend: &LlamaBackend,
    model: &LlamaModel,
    model_params: &ModelParams,
    prompt: &str,
    params: &GenerationParams,
) -> Result<String, GenerationError> {
    let n_ctx = model_params.context_size;
    let threads = model_params.threads as i32;
    let ctx_params = LlamaContextParams::default()
        .with_n_ctx(NonZeroU32::new(n_ctx))
        .with_n_batch(n_ctx)
        .with_n_threads(threads)
        .with_n_threads_batch(threads);

    let mut context = model
        .new_context(backend, ctx_params)
        .map_err(inference_error("failed to create context"))?;

    let tokens = model
        .str_to_token(prompt, AddBos::Always)
        .map_err(inference_error("tokenization failed"))?;

    if tokens.is_empty() {
        return Ok(String::new());
    }
    if tokens.len() >= n_ctx as usize {
        return Err(GenerationError::Inference(format!(
            "prompt is {} tokens, context window is {}",
            tokens.len(),
            n_ctx
        )));
    }

    let mut batch = LlamaBatch::new(n_ctx as usize, 1);
    let last_index = tokens.len() - 1;
    for (i, &token) in tokens.iter().enumerate() {
        batch
            .add(token, i as i32, &[0], i == last_index)
            .map_err(inference_error("failed to add prompt token to batch"))?;
    }
    context
        .decode(&mut batch)
        .map_err(inference_error("failed to decode prompt"))?;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let mut sampler = LlamaSampler::chain_simple([
        LlamaSampler::penalties(PENALTY_LAST_N, params.repeat_penalty, 0.0, 0.0),
        LlamaSampler::top_k(params.top_k as i32),
        LlamaSampler::top_p(params.top_p, 1),
        LlamaSampler::temp(params.temperature),
        LlamaSampler::dist(seed),
    ]);

    let mut generated = String::new();
    let mut decoder = TokenTextDecoder::new();
    let mut next_pos = tokens.len() as i32;

    for _ in 0..params.max_tokens {
        if next_pos as u32 >= n_ctx {
            break;
        }

        let token = sampler.sample(&context, batch.n_tokens() - 1);
        sampler.accept(token);

        if model.is_eog_token(token) {
            break;
        }

        let bytes = model
            .token_to_bytes(token, Special::Plaintext)
            .map_err(inference_error("failed to detokenize"))?;
        decoder.push(&bytes, &mut generated);

        if let Some(cut) = find_stop_sequence(&generated, &params.stop) {
            generated.truncate(cut);
            return Ok(generated);
        }

        batch.clear();
        batch
            .add(token, next_pos, &[0], true)
            .map_err(inference_error("failed to add generated token to batch"))?;
        context
            .decode(&mut batch)
            .map_err(inference_error("failed to decode token"))?;

        next_pos += 1;
    }

    decoder.finish(&mut generated);
    Ok(generated)
}
