//! Cash-secured put recommendation from support levels.
//!
//! The strike is the support level nearest (by absolute distance) to the
//! current close, discounted by the safety margin and rounded to cents.
//! Supports above the current close are eligible too.


pub const DEFAULT_SAFETY_MARGIN: f64 = 0.95;
pub const DEFAULT_DAYS_TO_EXPIRY: usize = 45;

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationPolicy {
    pub safety_margin: f64,
    pub days_to_expiry: usize,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
            days_to_expiry: DEFAULT_DAYS_TO_EXPIRY,
        }
    }
}

/// Implied volatility as supplied by the market data provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpliedVolatility {
    Observed(f64),
    Unavailable,
}

impl ImpliedVolatility {
    /// Non-finite readings count as unavailable.
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => ImpliedVolatility::Observed(v),
            _ => ImpliedVolatility::Unavailable,
        }
    }

    /// The value used in calculations; `0.0` when unavailable.
    pub fn effective(&self) -> f64 {
        match self {
            ImpliedVolatility::Observed(v) => *v,
            ImpliedVolatility::Unavailable => 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ImpliedVolatility::Unavailable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub current_price: f64,
    pub nearest_support: f64,
    pub moving_average_long: Option<f64>,
    pub long_window: usize,
    pub strike_price: f64,
    pub days_to_expiry: usize,
    pub implied_volatility: ImpliedVolatility,
    pub narrative: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRecommendationReason {
    NoSupportLevels,
    StrikeNotPositive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Recommended(Recommendation),
    NoRecommendationPossible(NoRecommendationReason),
}

impl RecommendationOutcome {
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            RecommendationOutcome::Recommended(r) => Some(r),
            RecommendationOutcome::NoRecommendationPossible(_) => None,
        }
    }

    pub fn narrative(&self) -> String {
        match self {
            RecommendationOutcome::Recommended(r) => r.narrative.clone(),
            RecommendationOutcome::NoRecommendationPossible(NoRecommendationReason::NoSupportLevels) => {
                "No support levels found. Recommendation not possible.".to_string()
            }
            RecommendationOutcome::NoRecommendationPossible(
                NoRecommendationReason::StrikeNotPositive,
            ) => "Support level too low for a positive strike. Recommendation not possible."
                .to_string(),
        }
    }
}

/// Inputs gathered from the other pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub current_price: f64,
    pub support_levels: &'a [f64],
    pub moving_average_long: Option<f64>,
    pub long_window: usize,
    pub implied_volatility: ImpliedVolatility,
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First support with the smallest absolute distance to `price`.
pub fn nearest_support(price: f64, support_levels: &[f64]) -> Option<f64> {
    support_levels.iter().copied().fold(None, |best, level| match best {
        Some(b) if (price - b).abs() <= (price - level).abs() => Some(b),
        _ => Some(level),
    })
}

pub fn recommend(input: &RecommendationInput, policy: &RecommendationPolicy) -> RecommendationOutcome {
    let Some(support) = nearest_support(input.current_price, input.support_levels) else {
        return RecommendationOutcome::NoRecommendationPossible(
            NoRecommendationReason::NoSupportLevels,
        );
    };

    let strike_price = round_to_cents(support * policy.safety_margin);
    if strike_price <= 0.0 {
        return RecommendationOutcome::NoRecommendationPossible(
            NoRecommendationReason::StrikeNotPositive,
        );
    }

    let mut recommendation = Recommendation {
        current_price: input.current_price,
        nearest_support: support,
        moving_average_long: input.moving_average_long,
        long_window: input.long_window,
        strike_price,
        days_to_expiry: policy.days_to_expiry,
        implied_volatility: input.implied_volatility,
        narrative: String::new(),
    };
    recommendation.narrative = render_narrative(&recommendation);
    RecommendationOutcome::Recommended(recommendation)
}

pub fn render_narrative(r: &Recommendation) -> String {
    let mut out = String::new();
    out.push_str(&format!("Current Price: {:.2} USD\n", r.current_price));
    out.push_str(&format!("Nearest Support: {:.2} USD\n", r.nearest_support));
    match r.moving_average_long {
        Some(ma) => {
            out.push_str(&format!("{}-Day Average: {:.2} USD\n", r.long_window, ma));
        }
        None => {
            out.push_str(&format!("{}-Day Average: N/A (insufficient history)\n", r.long_window));
        }
    }
    out.push_str(&format!("Recommended Strike Price: {:.2} USD\n", r.strike_price));
    out.push_str(&format!("Recommended Duration (DTE): {} days\n", r.days_to_expiry));
    match r.implied_volatility {
        ImpliedVolatility::Observed(iv) => {
            out.push_str(&format!("Implied Volatility (IV): {:.2}%\n", iv * 100.0));
        }
        ImpliedVolatility::Unavailable => {
            out.push_str("Implied Volatility (IV): 0.00% (estimate unavailable)\n");
        }
    }
    out.push_str("Comment: Secure strike price based on support level for attractive premiums.");
    out
}
