//! Integration tests for the lectern library.
//! The live tests require a Groq API key in the environment to run.

#[cfg(test)]
mod tests {
    use lectern::config::DEFAULT_MODEL;
    use lectern::{
        CompletionRequest, CompletionTransport, DirectClient, GroqConfig, Router, TransportMode,
    };

    #[tokio::test]
    async fn test_direct_completion() {
        // This test requires GROQ_API_KEY to be set
        let config = GroqConfig::from_env();
        if !config.has_usable_key() {
            eprintln!("Skipping test: GROQ_API_KEY not set");
            return;
        }

        let client = DirectClient::new(config).expect("Failed to create client");
        let request = CompletionRequest::exchange(
            DEFAULT_MODEL,
            "You answer with a single word.",
            "Say 'test'",
            0.0,
            16,
        );

        let response = client.complete(&request).await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
        assert!(response.unwrap().first_content().is_some());
    }

    #[tokio::test]
    async fn test_router_always_returns_a_value() {
        let config = GroqConfig::from_env();
        let router = Router::for_mode(TransportMode::Direct, "", config.clone())
            .expect("Failed to build router");

        let result = router.assistant_reply("Độc lập dân tộc là gì?").await;
        if config.has_usable_key() {
            // With a real key either outcome is legitimate (the upstream may
            // rate limit), but it must arrive as a value.
            assert!(!result.text().is_empty());
        } else {
            // Without a key the direct path short-circuits into the setup
            // instructions rather than erroring.
            assert!(result.is_failure());
        }
    }
}
