//! Built-in model catalog.
//!
//! | Key | Provider | Model id |
//! |-----|----------|----------|
//! | `gpt-4o`, `gpt-4-turbo`, `gpt-3.5-turbo` | `openai` | as named |
//! | `claude-3.5-sonnet`, `claude-3-opus`, `claude-3-haiku` | `anthropic` | dated snapshot ids |
//! | `llama3-70b`, `mixtral-8x7b`, `gemma-7b` | `groq` | context-suffixed ids |
//! | `deepseek-chat`, `deepseek-coder`, `deepseek-r1-huawei` | `deepseek` | as named |
//! | `llama2`, `codellama` | `ollama` | as named |

use crate::config::ModelConfig;
use crate::provider::ProviderTag;

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const HUAWEI_DEEPSEEK_R1_BASE_URL: &str =
    "https://maas-cn-southwest-2.modelarts-maas.com/v1/infers/8a062fd4-7367-4ab4-a936-5eeb8fb821c4/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Returns the static model entries in catalog order.
///
/// Secrets are not resolved; see [`ModelConfig::resolve_api_key`].
#[must_use]
pub fn static_models() -> Vec<ModelConfig> {
    vec![
        // OpenAI
        ModelConfig::new("gpt-4o", "GPT-4o", ProviderTag::OpenAi, "gpt-4o")
            .with_api_key_env("OPENAI_API_KEY")
            .with_description("OpenAI's latest GPT-4o model with excellent performance"),
        ModelConfig::new(
            "gpt-4-turbo",
            "GPT-4 Turbo",
            ProviderTag::OpenAi,
            "gpt-4-turbo-preview",
        )
        .with_api_key_env("OPENAI_API_KEY")
        .with_description("OpenAI GPT-4 Turbo, a faster GPT-4"),
        ModelConfig::new(
            "gpt-3.5-turbo",
            "GPT-3.5 Turbo",
            ProviderTag::OpenAi,
            "gpt-3.5-turbo",
        )
        .with_api_key_env("OPENAI_API_KEY")
        .with_description("OpenAI GPT-3.5 Turbo, economical and practical"),
        // Anthropic
        ModelConfig::new(
            "claude-3.5-sonnet",
            "Claude 3.5 Sonnet",
            ProviderTag::Anthropic,
            "claude-3-5-sonnet-20241022",
        )
        .with_api_key_env("ANTHROPIC_API_KEY")
        .with_description("Anthropic's latest Claude 3.5 Sonnet model"),
        ModelConfig::new(
            "claude-3-opus",
            "Claude 3 Opus",
            ProviderTag::Anthropic,
            "claude-3-opus-20240229",
        )
        .with_api_key_env("ANTHROPIC_API_KEY")
        .with_description("Anthropic's most capable Claude 3 Opus model"),
        ModelConfig::new(
            "claude-3-haiku",
            "Claude 3 Haiku",
            ProviderTag::Anthropic,
            "claude-3-haiku-20240307",
        )
        .with_api_key_env("ANTHROPIC_API_KEY")
        .with_description("Anthropic's fastest Claude 3 Haiku model"),
        // Groq
        ModelConfig::new(
            "llama3-70b",
            "Llama 3 70B",
            ProviderTag::Groq,
            "llama3-70b-8192",
        )
        .with_api_key_env("GROQ_API_KEY")
        .with_max_tokens(8192)
        .with_description("Meta Llama 3 70B, a high-performance open model"),
        ModelConfig::new(
            "mixtral-8x7b",
            "Mixtral 8x7B",
            ProviderTag::Groq,
            "mixtral-8x7b-32768",
        )
        .with_api_key_env("GROQ_API_KEY")
        .with_max_tokens(32768)
        .with_description("Mistral AI Mixtral 8x7B mixture-of-experts model"),
        ModelConfig::new("gemma-7b", "Gemma 7B", ProviderTag::Groq, "gemma-7b-it")
            .with_api_key_env("GROQ_API_KEY")
            .with_max_tokens(8192)
            .with_description("Google Gemma 7B instruction-tuned model"),
        // DeepSeek
        ModelConfig::new(
            "deepseek-chat",
            "DeepSeek Chat",
            ProviderTag::DeepSeek,
            "deepseek-chat",
        )
        .with_api_key_env("DEEPSEEK_API_KEY")
        .with_base_url(DEEPSEEK_BASE_URL)
        .with_description("DeepSeek conversational model"),
        ModelConfig::new(
            "deepseek-coder",
            "DeepSeek Coder",
            ProviderTag::DeepSeek,
            "deepseek-coder",
        )
        .with_api_key_env("DEEPSEEK_API_KEY")
        .with_base_url(DEEPSEEK_BASE_URL)
        .with_description("DeepSeek code generation model"),
        ModelConfig::new(
            "deepseek-r1-huawei",
            "DeepSeek-R1 huawei",
            ProviderTag::DeepSeek,
            "DeepSeek-R1",
        )
        .with_api_key_env("DEEPSEEK_R1_API_KEY_HUAWEI")
        .with_base_url(HUAWEI_DEEPSEEK_R1_BASE_URL)
        .with_temperature(1.0)
        .with_description("Self-hosted DeepSeek-R1 with strong reasoning"),
        // Ollama
        ModelConfig::new("llama2", "Llama 2 Local", ProviderTag::Ollama, "llama2")
            .with_base_url(OLLAMA_BASE_URL)
            .with_description("Llama 2 running locally"),
        ModelConfig::new(
            "codellama",
            "Code Llama Local",
            ProviderTag::Ollama,
            "codellama",
        )
        .with_base_url(OLLAMA_BASE_URL)
        .with_description("Code Llama running locally, for programming"),
    ]
}
