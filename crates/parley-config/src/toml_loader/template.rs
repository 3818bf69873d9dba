//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
#
# API keys are read from the environment (or a .env file):
#   GEMINI_API_KEY, MISTRAL_API_KEY, GROQ_API_KEY, OPENAI_API_KEY (dictation)

[chat]
# default_provider = "gemini"     # gemini, mistral, groq
# default_model = "gemini-1.5-pro"
# conversation_title = "Nueva conversación"
# greeting = "¡Hola! Soy un asistente de IA. ¿En qué puedo ayudarte hoy?"
# image_prompt = "Describe esta imagen en detalle"
# image_caption = "Analiza esta imagen por favor"
# stale_reply = "deliver_to_origin"   # deliver_to_origin, discard

[providers.gemini]
# models = ["gemini-1.5-pro", "gemini-1.5-flash"]
# temperature = 0.7      # 0.0-2.0
# max_tokens = 2048      # 1-32768
# top_p = 1.0            # 0.0-1.0
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"
# api_key_env = "GEMINI_API_KEY"

[providers.mistral]
# models = ["mistral-tiny", "mistral-small", "mistral-medium"]
# temperature = 0.7

[providers.groq]
# models = ["mixtral-8x7b-32768", "gemma-7b-it", "llama2-70b-4096"]
# temperature = 0.7

[storage]
# max_messages = 100     # 1-10000, oldest dropped first
# directory = ""         # default: <data dir>/parley/store

[voice]
# enabled = true
# model = "whisper-1"
# language = "es"
# api_key_env = "OPENAI_API_KEY"

[ui]
# color = true
# prompt = "› "

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
