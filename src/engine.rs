/// Notification rule engine. Decides which configured rules fire for a
/// context snapshot, renders their messages, and ranks them.
///
/// `RuleEngine::evaluate` is a pure function of (context, rules): no I/O, no
/// retained state, safe to share across threads. Everything that can go
/// wrong inside a rule (missing signal, unknown field, type mismatch) makes
/// that condition false; nothing is ever raised to the caller.
///
/// `run` wraps the engine in the async pipeline used by the dispatch side:
///   context assembly -> [engine::run] -> notification dispatch
use crate::{
    context::Context,
    metadata::{self, RecommendationMetadata},
    rules::{
        AirQualityEvaluator, Condition, ConditionEvaluator, LogicalOperator, Rule, RuleCategory,
        TransitEvaluator, WeatherEvaluator,
    },
    template,
};
use anyhow::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub rule_id:   String,
    pub rule_name: String,
    pub category:  RuleCategory,
    pub priority:  i32,
    pub message:   String,
    pub icon:      String,
    pub metadata:  RecommendationMetadata,
}

/// Display icon per rule category. Independent of rule priority.
pub fn icon_for(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Weather           => "🌤️",
        RuleCategory::AirQuality        => "😷",
        RuleCategory::Transit           => "🚌",
        RuleCategory::TransitComparison => "🚇",
        RuleCategory::General           => "🔔",
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct RuleEngine {
    /// Scanned in order; the first evaluator that claims a data source wins.
    evaluators: Vec<Box<dyn ConditionEvaluator>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(vec![
            Box::new(WeatherEvaluator),
            Box::new(AirQualityEvaluator),
            Box::new(TransitEvaluator),
        ])
    }
}

static DEFAULT_ENGINE: Lazy<RuleEngine> = Lazy::new(RuleEngine::default);

/// Evaluate with the default evaluator registry.
pub fn evaluate(ctx: &Context, rules: &[Rule]) -> Vec<Recommendation> {
    DEFAULT_ENGINE.evaluate(ctx, rules)
}

/// Highest-priority recommendation of an already ranked list.
pub fn top_pick(ranked: &[Recommendation]) -> Option<&Recommendation> {
    ranked.first()
}

impl RuleEngine {
    pub fn new(evaluators: Vec<Box<dyn ConditionEvaluator>>) -> Self {
        Self { evaluators }
    }

    /// Matching enabled rules, highest priority first. Equal priorities keep
    /// their order from `rules`.
    pub fn evaluate(&self, ctx: &Context, rules: &[Rule]) -> Vec<Recommendation> {
        let mut matches: Vec<Recommendation> = rules
            .iter()
            .filter(|rule| rule.enabled)
            .filter(|rule| self.rule_matches(ctx, rule))
            .map(|rule| build_recommendation(rule, ctx))
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.priority.cmp(&a.priority));

        tracing::debug!(
            "alert {}: {}/{} rules matched",
            ctx.alert_id,
            matches.len(),
            rules.len()
        );
        matches
    }

    pub fn rule_matches(&self, ctx: &Context, rule: &Rule) -> bool {
        let matched = fold_chain(&rule.conditions, |cond| self.evaluate_condition(ctx, cond));
        if matched {
            tracing::debug!("Rule '{}' ({}) matched", rule.name, rule.id);
        }
        matched
    }

    pub fn evaluate_condition(&self, ctx: &Context, condition: &Condition) -> bool {
        let verdict = self
            .evaluators
            .iter()
            .find(|ev| ev.can_evaluate(condition.data_source))
            .map(|ev| ev.evaluate(ctx, condition))
            .unwrap_or(false);
        tracing::trace!(
            "{:?}.{} {:?} {} → {}",
            condition.data_source,
            condition.field,
            condition.operator,
            condition.value,
            verdict
        );
        verdict
    }
}

/// Left-to-right fold of a condition chain. No precedence, no grouping:
/// `a AND b OR c` is `(a AND b) OR c`, and `a OR b AND c` is `(a OR b) AND c`.
///
/// The operator joining verdict(i-1) and verdict(i) is read from
/// `conditions[i-1].logical_operator` (unset = AND). An empty chain never
/// matches.
pub fn fold_chain(conditions: &[Condition], mut verdict: impl FnMut(&Condition) -> bool) -> bool {
    let Some((first, rest)) = conditions.split_first() else {
        return false;
    };

    let mut result = verdict(first);
    let mut joiner = first.logical_operator.unwrap_or_default();
    for cond in rest {
        let v = verdict(cond);
        result = match joiner {
            LogicalOperator::And => result && v,
            LogicalOperator::Or  => result || v,
        };
        joiner = cond.logical_operator.unwrap_or_default();
    }
    result
}

fn build_recommendation(rule: &Rule, ctx: &Context) -> Recommendation {
    Recommendation {
        rule_id:   rule.id.clone(),
        rule_name: rule.name.clone(),
        category:  rule.category,
        priority:  rule.priority,
        message:   template::render(&rule.message_template, ctx),
        icon:      icon_for(rule.category).to_owned(),
        metadata:  metadata::extract(rule, ctx),
    }
}

// ---------------------------------------------------------------------------
// Pipeline task
// ---------------------------------------------------------------------------

/// Top recommendation for one alert firing, ready for push delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub user_id:        String,
    pub alert_id:       String,
    pub recommendation: Recommendation,
}

/// Evaluates every incoming context against the current rule set and forwards
/// the top recommendation, if any, to the dispatcher.
///
/// Rule-set replacements arriving on `rules_rx` apply to all later contexts.
/// Returns when the context channel closes or the dispatcher goes away.
pub async fn run(
    mut context_rx: Receiver<Context>,
    mut rules_rx:   Receiver<Vec<Rule>>,
    dispatch_tx:    Sender<Dispatch>,
    initial_rules:  Vec<Rule>,
) -> Result<()> {
    let engine = RuleEngine::default();
    let mut rules = initial_rules;
    let mut evaluated: u64 = 0;

    loop {
        tokio::select! {
            biased;

            // Rule reloads are rare; apply before any queued context
            Some(new_rules) = rules_rx.recv() => {
                tracing::info!("Rule set replaced ({} → {} rules)", rules.len(), new_rules.len());
                rules = new_rules;
            }

            maybe_ctx = context_rx.recv() => {
                let Some(ctx) = maybe_ctx else { break };
                evaluated += 1;

                let ranked = engine.evaluate(&ctx, &rules);
                let Some(top) = top_pick(&ranked) else {
                    tracing::debug!("alert {}: nothing to send", ctx.alert_id);
                    continue;
                };

                let dispatch = Dispatch {
                    user_id:        ctx.user_id.clone(),
                    alert_id:       ctx.alert_id.clone(),
                    recommendation: top.clone(),
                };
                if dispatch_tx.send(dispatch).await.is_err() {
                    tracing::warn!("Dispatcher closed, engine exiting");
                    return Ok(());
                }
            }
        }
    }

    tracing::info!("Context stream closed after {} evaluations", evaluated);
    Ok(())
}
