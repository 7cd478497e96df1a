use crate::config::Config;
use crate::error::AssembleError;
use crate::fetcher::Fetcher;
use crate::generator::{NarrativeGenerator, OpenAiCompletion};
use crate::month::EditionMonth;
use crate::sections::GeneratedDocument;
use crate::session::Session;
use std::sync::Arc;
use tracing::info;

/// Where the generator's input comes from for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSource {
    Url(String),
    Manual(String),
}

impl RawSource {
    /// Manual text wins over a URL when both are filled in. Blank values
    /// count as absent.
    pub fn select(url: Option<&str>, text: Option<&str>) -> Result<Self, AssembleError> {
        fn filled(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        if let Some(text) = filled(text) {
            Ok(RawSource::Manual(text.to_string()))
        } else if let Some(url) = filled(url) {
            Ok(RawSource::Url(url.trim().to_string()))
        } else {
            Err(AssembleError::EmptyInput)
        }
    }
}

/// Fetch (for URL sources), generate, then fill the session.
pub struct Assembler {
    fetcher: Fetcher,
    generator: NarrativeGenerator,
}

impl Assembler {
    pub fn new(fetcher: Fetcher, generator: NarrativeGenerator) -> Self {
        Self { fetcher, generator }
    }

    /// Page fetcher plus the OpenAI backend, as configured.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let service = OpenAiCompletion::new(config.api_key.clone(), config.completion_timeout)?
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone());
        Ok(Self::new(
            Fetcher::new(config.fetch_timeout)?,
            NarrativeGenerator::new(Arc::new(service)),
        ))
    }

    /// Runs the fetch and the completion call back to back. Either failure
    /// ends the action.
    pub async fn draft(
        &self,
        source: &RawSource,
        month: EditionMonth,
    ) -> Result<GeneratedDocument, AssembleError> {
        let input = match source {
            RawSource::Manual(text) => text.clone(),
            RawSource::Url(url) => self.fetcher.fetch_excerpt(url).await?,
        };
        Ok(self.generator.generate(&input, month).await?)
    }

    /// On error the session is left exactly as it was.
    pub async fn assemble(
        &self,
        source: &RawSource,
        month: EditionMonth,
        session: &mut Session,
    ) -> Result<(), AssembleError> {
        let document = self.draft(source, month).await?;
        session.set_month(month);
        session.update_from_document(document);
        info!(%month, "session fields refreshed from generated draft");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::fetcher::DEFAULT_FETCH_TIMEOUT;
    use crate::generator::CompletionService;
    use crate::session::Field;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ZIGGY_DRAFT: &str = "## 🎯 Featured Pressing\nBowie's Ziggy Stardust UK pressing just landed.\n\n## 📈 Valuation Tip\nCheck matrix BGBS 0864-2E.\n\n## 🆕 Just In\n- Bowie Ziggy Stardust UK 1st\n\n## 🗞️ Collector Buzz\nRSD reissues incoming.";

    struct Canned {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionService for Canned {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| GenerationError::MalformedResponse("stub failure".into()))
        }
    }

    fn assembler(reply: Option<&'static str>) -> (Assembler, Arc<Canned>) {
        let service = Arc::new(Canned {
            reply,
            calls: AtomicUsize::new(0),
        });
        let assembler = Assembler::new(
            Fetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap(),
            NarrativeGenerator::new(service.clone()),
        );
        (assembler, service)
    }

    #[test]
    fn manual_text_takes_precedence() {
        assert_eq!(
            RawSource::select(Some("https://shop.example/p"), Some("notes")).unwrap(),
            RawSource::Manual("notes".into())
        );
        assert_eq!(
            RawSource::select(Some(" https://shop.example/p "), Some("   ")).unwrap(),
            RawSource::Url("https://shop.example/p".into())
        );
    }

    #[test]
    fn no_input_is_an_explicit_error() {
        assert!(matches!(RawSource::select(None, None), Err(AssembleError::EmptyInput)));
        assert!(matches!(
            RawSource::select(Some(""), Some(" \n")),
            Err(AssembleError::EmptyInput)
        ));
    }

    #[tokio::test]
    async fn manual_notes_fill_the_form() {
        let (assembler, _) = assembler(Some(ZIGGY_DRAFT));
        let mut session = Session::new();
        let source = RawSource::select(None, Some("- Bowie Ziggy Stardust UK 1st Press just arrived")).unwrap();

        assembler.assemble(&source, EditionMonth::April, &mut session).await.unwrap();

        assert_eq!(
            session.get(Field::FeaturedPressing),
            "Bowie's Ziggy Stardust UK pressing just landed."
        );
        assert_eq!(session.get(Field::ValuationTip), "Check matrix BGBS 0864-2E.");
        assert_eq!(session.month(), Some(EditionMonth::April));
        assert_eq!(session.full_text().as_str(), ZIGGY_DRAFT);
    }

    #[tokio::test]
    async fn missing_section_leaves_only_that_field_blank() {
        let without_buzz = ZIGGY_DRAFT.split("\n\n## 🗞️").next().unwrap();
        let (assembler, _) = assembler(Some(without_buzz));
        let mut session = Session::new();

        assembler
            .assemble(&RawSource::Manual("notes".into()), EditionMonth::April, &mut session)
            .await
            .unwrap();

        assert_eq!(session.get(Field::CollectorBuzz), "");
        assert_eq!(
            session.get(Field::FeaturedPressing),
            "Bowie's Ziggy Stardust UK pressing just landed."
        );
        assert_eq!(session.get(Field::ValuationTip), "Check matrix BGBS 0864-2E.");
        assert_eq!(session.get(Field::JustIn), "- Bowie Ziggy Stardust UK 1st");
    }

    #[tokio::test]
    async fn generation_failure_leaves_session_untouched() {
        let (assembler, service) = assembler(None);
        let mut session = Session::new();
        session.set(Field::FeaturedPressing, "kept");

        let err = assembler
            .assemble(&RawSource::Manual("notes".into()), EditionMonth::May, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, AssembleError::Generation(_)));
        assert_eq!(session.get(Field::FeaturedPressing), "kept");
        assert_eq!(session.month(), None);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_failure_stops_before_generation() {
        let (assembler, service) = assembler(Some(ZIGGY_DRAFT));
        let mut session = Session::new();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = assembler
            .assemble(&RawSource::Url(format!("http://{addr}/")), EditionMonth::May, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, AssembleError::Fetch(_)));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(session.full_text().is_empty());
    }
}
