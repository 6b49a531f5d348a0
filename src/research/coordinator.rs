use crate::{
    agents::{
        clarifier::DEFAULT_CLARIFICATION_QUESTIONS, planner::DEFAULT_SEARCHES_PER_PLAN,
        ClarificationAgent, LlmSearcher, PlannerAgent, Searcher, WriterAgent,
    },
    llm::{LLMClient, LLMClientFactory},
    notify::{Notifier, SendGridTransport},
    research::{
        enhance::{build_enhanced_query, clarification_context, missing_answers},
        execution::SearchExecutor,
        gather::GatherOptions,
        scope::{CorrelationSink, ScopeGuard, ScopeKey, TracingSink},
    },
    types::{
        CorrelationId, ProgressEvent, Report, ResearchError, Result, WorkflowSnapshot,
        WorkflowState,
    },
    utils::toml_config::{NotificationConfig, ResearchConfig},
};
use async_stream::try_stream;
use chrono::Utc;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Lazy stream of workflow milestones; an `Err` item is terminal
pub type ProgressStream = BoxStream<'static, Result<ProgressEvent>>;

struct Stages {
    clarifier: ClarificationAgent,
    planner: PlannerAgent,
    searches: SearchExecutor,
    writer: WriterAgent,
    notifier: Notifier,
}

/// Drives a research workflow through its stages.
///
/// The coordinator keeps no per-workflow state: [`start`](Self::start) hands
/// back a [`WorkflowSnapshot`] and [`resume`](Self::resume) takes it back.
#[derive(Clone)]
pub struct ResearchCoordinator {
    stages: Arc<Stages>,
    sink: Arc<dyn CorrelationSink>,
    clarification_questions: usize,
}

/// Inputs that differ between the interactive and direct paths
struct Continuation {
    planning_query: String,
    clarification_context: Option<Vec<String>>,
}

impl ResearchCoordinator {
    /// Coordinator running every stage on `llm`, with default sizes
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self::builder(llm).build()
    }

    pub fn builder(llm: Arc<dyn LLMClient>) -> ResearchCoordinatorBuilder {
        ResearchCoordinatorBuilder::new(llm)
    }

    /// Assemble a coordinator from configuration
    pub async fn from_config(config: &ResearchConfig) -> Result<Self> {
        let factory = LLMClientFactory::new(config.provider()?);
        let default_llm = factory.create_default().await?;

        let clarification_llm =
            stage_llm(&factory, &default_llm, config.models.clarification.as_deref()).await?;
        let planning_llm =
            stage_llm(&factory, &default_llm, config.models.planning.as_deref()).await?;
        let search_llm = stage_llm(&factory, &default_llm, config.models.search.as_deref()).await?;
        let synthesis_llm =
            stage_llm(&factory, &default_llm, config.models.synthesis.as_deref()).await?;

        let searcher = LlmSearcher::new(search_llm);
        #[cfg(feature = "web-search")]
        let searcher = if config.search.web_lookup {
            searcher.with_web_lookup(
                Arc::new(crate::tools::search::DuckDuckGoLookup::new()),
                config.search.web_results,
            )
        } else {
            searcher
        };
        #[cfg(not(feature = "web-search"))]
        let searcher = {
            if config.search.web_lookup {
                warn!("Web lookup requested but the 'web-search' feature is not enabled");
            }
            searcher
        };

        info!(
            provider = factory.default_provider().name(),
            model = factory.default_provider().model(),
            "Research coordinator configured"
        );

        Ok(Self::builder(default_llm)
            .clarification_llm(clarification_llm)
            .planning_llm(planning_llm)
            .synthesis_llm(synthesis_llm)
            .searcher(Arc::new(searcher))
            .notifier(notifier_from_config(&config.notification)?)
            .clarification_questions(config.workflow.clarification_questions)
            .searches_per_plan(config.workflow.searches_per_plan)
            .gather_options(config.search.gather_options())
            .build())
    }

    pub fn clarification_questions(&self) -> usize {
        self.clarification_questions
    }

    /// Phase one: generate clarification questions and suspend.
    pub async fn start(&self, query: &str) -> Result<WorkflowSnapshot> {
        validate_query(query)?;

        let started_at = Utc::now();
        let correlation_id = CorrelationId::generate();
        let scope = ScopeGuard::open(self.sink.clone(), ScopeKey::start(&correlation_id));

        let clarification_plan = async {
            info!("Getting clarification questions...");
            self.stages
                .clarifier
                .generate_clarifications(query, self.clarification_questions)
                .await
        }
        .instrument(scope.span())
        .await?;

        Ok(WorkflowSnapshot {
            correlation_id,
            original_query: query.to_string(),
            clarification_plan,
            started_at,
        })
    }

    /// Phase two: continue a suspended workflow with the user's answers.
    ///
    /// Answers are validated before any stage runs. Answers beyond the
    /// length of the clarification plan are ignored.
    pub fn resume(&self, snapshot: WorkflowSnapshot, answers: Vec<String>) -> Result<ProgressStream> {
        if snapshot.correlation_id.is_empty() {
            return Err(ResearchError::InvalidInput(
                "Workflow snapshot has no correlation id".to_string(),
            ));
        }

        let scope = ScopeGuard::open(
            self.sink.clone(),
            ScopeKey::resume(&snapshot.correlation_id),
        );

        let mut answers = answers;
        answers.truncate(snapshot.clarification_plan.len());

        let missing = missing_answers(&snapshot.clarification_plan, &answers);
        if !missing.is_empty() {
            scope
                .span()
                .in_scope(|| warn!(missing = ?missing, "Clarification answers incomplete"));
            return Err(ResearchError::IncompleteAnswers { missing });
        }

        let planning_query = build_enhanced_query(
            &snapshot.original_query,
            &snapshot.clarification_plan,
            &answers,
        );
        let context = clarification_context(&snapshot.clarification_plan, &answers);
        let state = WorkflowState::from_snapshot(snapshot, answers);

        Ok(Box::pin(continue_workflow(
            self.stages.clone(),
            state,
            Continuation {
                planning_query,
                clarification_context: Some(context),
            },
            scope,
        )))
    }

    /// Non-interactive path as a progress stream: plans from the raw query
    pub fn stream_direct(&self, query: &str) -> Result<ProgressStream> {
        validate_query(query)?;

        let correlation_id = CorrelationId::generate();
        let scope = ScopeGuard::open(self.sink.clone(), ScopeKey::direct(&correlation_id));
        let state = WorkflowState::direct(correlation_id, query);

        Ok(Box::pin(continue_workflow(
            self.stages.clone(),
            state,
            Continuation {
                planning_query: query.to_string(),
                clarification_context: None,
            },
            scope,
        )))
    }

    /// Non-interactive path: run every stage and return the report
    pub async fn run_direct(&self, query: &str) -> Result<Report> {
        let mut events = self.stream_direct(query)?;
        let mut report = None;

        while let Some(event) = events.next().await {
            match event? {
                ProgressEvent::Completed(state) => report = state.report,
                event => debug!("{}", event),
            }
        }

        report.ok_or_else(|| ResearchError::Internal("workflow ended without a report".to_string()))
    }
}

async fn stage_llm(
    factory: &LLMClientFactory,
    default_llm: &Arc<dyn LLMClient>,
    model: Option<&str>,
) -> Result<Arc<dyn LLMClient>> {
    match model {
        Some(model) => factory.create_for_model(Some(model)).await,
        None => Ok(default_llm.clone()),
    }
}

fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(ResearchError::InvalidInput(
            "Research query cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn notifier_from_config(config: &NotificationConfig) -> Result<Notifier> {
    match config {
        NotificationConfig::Log => Ok(Notifier::log()),
        NotificationConfig::SendGrid {
            api_key_env,
            from,
            to,
            endpoint,
        } => {
            let api_key = ResearchConfig::validate_env_var(api_key_env)?;
            let mut transport = SendGridTransport::new(api_key, from.clone(), to.clone())?;
            if let Some(endpoint) = endpoint {
                transport = transport.with_endpoint(endpoint.clone())?;
            }
            Ok(Notifier::new(Arc::new(transport)))
        }
    }
}

/// Planning, search, synthesis and notification, in strict sequence
fn continue_workflow(
    stages: Arc<Stages>,
    mut state: WorkflowState,
    continuation: Continuation,
    scope: ScopeGuard,
) -> impl Stream<Item = Result<ProgressEvent>> + Send + 'static {
    try_stream! {
        let span = scope.span();

        if let Some(context) = &continuation.clarification_context {
            span.in_scope(|| info!(answered = context.len(), "Enhanced query created"));
            yield ProgressEvent::EnhancedQueryBuilt { answered: context.len() };
        }

        yield ProgressEvent::PlanningSearches;
        state.search_plan = stages
            .planner
            .plan_searches(&continuation.planning_query)
            .instrument(span.clone())
            .await?;
        yield ProgressEvent::SearchesPlanned { count: state.search_plan.len() };

        state.search_results = stages
            .searches
            .execute_searches(&state.search_plan)
            .instrument(span.clone())
            .await;
        yield ProgressEvent::SearchesComplete {
            succeeded: state.search_results.len(),
            attempted: state.search_plan.len(),
        };

        let report = stages
            .writer
            .synthesize(
                &state.original_query,
                continuation.clarification_context.as_deref(),
                &state.search_results,
            )
            .instrument(span.clone())
            .await?;
        yield ProgressEvent::ReportWritten;

        match stages.notifier.notify(&report).instrument(span.clone()).await {
            Ok(()) => {
                yield ProgressEvent::NotificationSent;
            }
            Err(e) => {
                span.in_scope(|| warn!("Notification failed, continuing: {}", e));
                yield ProgressEvent::NotificationFailed { reason: e.to_string() };
            }
        }

        state.report = Some(report);
        span.in_scope(|| info!("Research complete"));
        yield ProgressEvent::Completed(Box::new(state));
    }
}

/// Builder for [`ResearchCoordinator`]
///
/// Every stage uses the base client unless overridden.
pub struct ResearchCoordinatorBuilder {
    llm: Arc<dyn LLMClient>,
    clarification_llm: Option<Arc<dyn LLMClient>>,
    planning_llm: Option<Arc<dyn LLMClient>>,
    synthesis_llm: Option<Arc<dyn LLMClient>>,
    searcher: Option<Arc<dyn Searcher>>,
    notifier: Option<Notifier>,
    sink: Option<Arc<dyn CorrelationSink>>,
    clarification_questions: usize,
    searches_per_plan: usize,
    gather_options: GatherOptions,
}

impl ResearchCoordinatorBuilder {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self {
            llm,
            clarification_llm: None,
            planning_llm: None,
            synthesis_llm: None,
            searcher: None,
            notifier: None,
            sink: None,
            clarification_questions: DEFAULT_CLARIFICATION_QUESTIONS,
            searches_per_plan: DEFAULT_SEARCHES_PER_PLAN,
            gather_options: GatherOptions::unbounded(),
        }
    }

    pub fn clarification_llm(mut self, llm: Arc<dyn LLMClient>) -> Self {
        self.clarification_llm = Some(llm);
        self
    }

    pub fn planning_llm(mut self, llm: Arc<dyn LLMClient>) -> Self {
        self.planning_llm = Some(llm);
        self
    }

    pub fn synthesis_llm(mut self, llm: Arc<dyn LLMClient>) -> Self {
        self.synthesis_llm = Some(llm);
        self
    }

    /// Replace the default model-backed searcher
    pub fn searcher(mut self, searcher: Arc<dyn Searcher>) -> Self {
        self.searcher = Some(searcher);
        self
    }

    pub fn notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn CorrelationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clarification_questions(mut self, count: usize) -> Self {
        self.clarification_questions = count;
        self
    }

    pub fn searches_per_plan(mut self, count: usize) -> Self {
        self.searches_per_plan = count;
        self
    }

    pub fn gather_options(mut self, options: GatherOptions) -> Self {
        self.gather_options = options;
        self
    }

    pub fn build(self) -> ResearchCoordinator {
        let pick = |stage: Option<Arc<dyn LLMClient>>| stage.unwrap_or_else(|| self.llm.clone());

        let searcher = self
            .searcher
            .clone()
            .unwrap_or_else(|| Arc::new(LlmSearcher::new(self.llm.clone())) as Arc<dyn Searcher>);

        let stages = Stages {
            clarifier: ClarificationAgent::new(pick(self.clarification_llm.clone())),
            planner: PlannerAgent::new(pick(self.planning_llm.clone()), self.searches_per_plan),
            searches: SearchExecutor::new(searcher).with_options(self.gather_options),
            writer: WriterAgent::new(pick(self.synthesis_llm.clone())),
            notifier: self.notifier.clone().unwrap_or_else(Notifier::log),
        };

        ResearchCoordinator {
            stages: Arc::new(stages),
            sink: self
                .sink
                .clone()
                .unwrap_or_else(|| Arc::new(TracingSink::new()) as Arc<dyn CorrelationSink>),
            clarification_questions: self.clarification_questions,
        }
    }
}
