use std::sync::Arc;
use std::time::Duration;

use chrono::Weekday;

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::fetchers::{ProxyClient, WordPressClient};
use crate::model::{GeneratedPlan, IngredientList, MealCandidate, SelectedMeals, UserProfile};
use crate::planner::{MealDetails, PlanAssembler, ShoppingListAssembler};
use crate::providers::{LlmProvider, OpenAIProvider};
use crate::sources::{
    collect_candidates, ContentApiSource, GenerativeSource, ProxySource, RecipeSource,
};

/// Where meal candidates come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// WordPress content API, called directly (default)
    #[default]
    ContentApi,
    /// WordPress content API through a running proxy
    Proxy,
    /// Suggestions from the generative provider
    Generative,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content-api" | "content_api" | "wordpress" => Ok(SourceKind::ContentApi),
            "proxy" => Ok(SourceKind::Proxy),
            "generative" | "ai" | "openai" => Ok(SourceKind::Generative),
            other => Err(format!("Unknown candidate source: {}", other)),
        }
    }
}

/// Builder for a configured [`Planner`]
#[derive(Default)]
pub struct PlannerBuilder {
    config: Option<PlannerConfig>,
    source: SourceKind,
    provider: Option<Arc<dyn LlmProvider>>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl PlannerBuilder {
    /// Use an explicit configuration instead of [`PlannerConfig::load`]
    ///
    /// # Example
    /// ```
    /// use meal_planner::{Planner, PlannerConfig};
    ///
    /// let builder = Planner::builder().config(PlannerConfig::default());
    /// ```
    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Choose where candidates come from
    ///
    /// # Example
    /// ```
    /// use meal_planner::{Planner, SourceKind};
    ///
    /// let builder = Planner::builder().source(SourceKind::Generative);
    /// ```
    pub fn source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    /// Use a ready-made provider instead of building one from configuration
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the generative provider
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the generative provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the content API timeout
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the planner
    ///
    /// A missing API key is not an error here: content-API candidates work
    /// without one, and the generative calls report [`PlannerError::MissingApiKey`].
    pub fn build(self) -> Result<Planner, PlannerError> {
        let mut config = match self.config {
            Some(config) => config,
            None => PlannerConfig::load()?,
        };
        if let Some(key) = self.api_key {
            config.provider.api_key = Some(key);
        }
        if let Some(model) = self.model {
            config.provider.model = model;
        }
        if let Some(timeout) = self.timeout {
            config.content.timeout = timeout.as_secs().max(1);
        }

        let provider = match self.provider {
            Some(provider) => Some(provider),
            None => match OpenAIProvider::new(&config.provider) {
                Ok(provider) => Some(Arc::new(provider) as Arc<dyn LlmProvider>),
                Err(PlannerError::MissingApiKey) => None,
                Err(e) => return Err(e),
            },
        };

        let source: Box<dyn RecipeSource> = match self.source {
            SourceKind::ContentApi => Box::new(ContentApiSource::new(
                WordPressClient::from_config(&config.content)?,
            )),
            SourceKind::Proxy => Box::new(ProxySource::new(ProxyClient::new(&config.proxy_url))),
            SourceKind::Generative => {
                let provider = provider.clone().ok_or(PlannerError::MissingApiKey)?;
                Box::new(GenerativeSource::new(provider))
            }
        };

        Ok(Planner {
            source,
            provider,
            candidate_limit: config.candidate_limit,
        })
    }
}

/// Entry point tying sources, routing and the generative stages together
pub struct Planner {
    source: Box<dyn RecipeSource>,
    provider: Option<Arc<dyn LlmProvider>>,
    candidate_limit: u32,
}

impl Planner {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use meal_planner::Planner;
    ///
    /// let builder = Planner::builder();
    /// ```
    pub fn builder() -> PlannerBuilder {
        PlannerBuilder::default()
    }

    fn provider(&self) -> Result<Arc<dyn LlmProvider>, PlannerError> {
        self.provider.clone().ok_or(PlannerError::MissingApiKey)
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Candidate pool for every slot in the profile
    pub async fn candidates(
        &self,
        profile: &UserProfile,
    ) -> Result<Vec<MealCandidate>, PlannerError> {
        self.candidates_with_limit(profile, self.candidate_limit).await
    }

    pub async fn candidates_with_limit(
        &self,
        profile: &UserProfile,
        limit: u32,
    ) -> Result<Vec<MealCandidate>, PlannerError> {
        collect_candidates(self.source.as_ref(), profile, limit).await
    }

    pub async fn plan(
        &self,
        profile: &UserProfile,
        selected: &SelectedMeals,
        start_day: Option<Weekday>,
    ) -> Result<GeneratedPlan, PlannerError> {
        PlanAssembler::new(self.provider()?)
            .generate(profile, selected, start_day)
            .await
    }

    pub async fn shopping_list(
        &self,
        profile: &UserProfile,
        selected: &SelectedMeals,
    ) -> Result<IngredientList, PlannerError> {
        ShoppingListAssembler::new(self.provider()?)
            .generate(profile, selected)
            .await
    }

    pub async fn meal_details(&self, meal_name: &str) -> Result<String, PlannerError> {
        MealDetails::new(self.provider()?).describe(meal_name).await
    }
}
