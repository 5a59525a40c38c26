//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Well-known key references and the variables they map to
static ENV_VAR_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    m.insert("openai", &["OPENAI_API_KEY"]);
    m.insert("anthropic", &["ANTHROPIC_API_KEY"]);
    m.insert("gemini", &["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", &["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("mistral", &["MISTRAL_API_KEY"]);
    m.insert("groq", &["GROQ_API_KEY"]);
    m.insert("azure", &["AZURE_API_KEY", "AZURE_OPENAI_API_KEY"]);
    m.insert("openrouter", &["OPENROUTER_API_KEY"]);
    m
});

/// Read-only store over environment variables
///
/// A reference resolves, in order, as:
/// - the variable of that exact name (`OPENAI_API_KEY`)
/// - a well-known provider mapping (`openai` → `OPENAI_API_KEY`)
/// - `<REFERENCE>_API_KEY`, upper-cased with `-` turned into `_`
///
/// Empty values count as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Variable names a provider reference maps to
    pub fn env_vars_for(reference: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(reference.to_lowercase().as_str()).copied()
    }

    /// `<REFERENCE>_API_KEY`
    pub fn derived_var_name(reference: &str) -> String {
        format!("{}_API_KEY", reference.to_uppercase().replace('-', "_"))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = non_empty_var(key) {
            return Some(value);
        }
        if let Some(vars) = Self::env_vars_for(key) {
            if let Some(value) = vars.iter().find_map(|v| non_empty_var(v)) {
                return Some(value);
            }
        }
        non_empty_var(&Self::derived_var_name(key))
    }

    fn store(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }

    fn delete(&self, _key: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_is_read_only() {
        let store = EnvSecretStore::new();
        assert_eq!(store.name(), "env");
        assert!(matches!(store.store("k", "v"), Err(SecretStoreError::ReadOnly)));
        assert!(matches!(store.delete("k"), Err(SecretStoreError::ReadOnly)));
    }

    #[test]
    fn test_env_store_direct_and_derived_lookup() {
        env::set_var("FLOWCALL_DIRECT_TEST_KEY", "direct");
        env::set_var("FLOWCALL_DERIVED_TEST_API_KEY", "derived");
        env::set_var("FLOWCALL_EMPTY_TEST_API_KEY", "");

        let store = EnvSecretStore::new();
        assert_eq!(store.get("FLOWCALL_DIRECT_TEST_KEY"), Some("direct".to_string()));
        assert_eq!(store.get("flowcall-derived-test"), Some("derived".to_string()));
        assert_eq!(store.get("flowcall_empty_test"), None);

        env::remove_var("FLOWCALL_DIRECT_TEST_KEY");
        env::remove_var("FLOWCALL_DERIVED_TEST_API_KEY");
        env::remove_var("FLOWCALL_EMPTY_TEST_API_KEY");
    }

    #[test]
    fn test_provider_mapping() {
        assert_eq!(EnvSecretStore::env_vars_for("OpenRouter"), Some(&["OPENROUTER_API_KEY"][..]));
        assert!(EnvSecretStore::env_vars_for("unknown").is_none());
        assert_eq!(EnvSecretStore::derived_var_name("my-proxy"), "MY_PROXY_API_KEY");
    }
}
