//! Insight taxonomy registry
//!
//! The fixed two-level taxonomy the analysis process classifies insights
//! into. Snapshots normally carry names and descriptions themselves; the
//! registry fills the gaps and supplies the default domain display order.

/// Static description of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainMeta {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub order: u32,
}

/// Static description of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyMeta {
    pub key: &'static str,
    pub domain: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const DOMAINS: &[DomainMeta] = &[
    DomainMeta {
        key: "spending_patterns",
        name: "Spending Patterns",
        description: "Recurring behaviors and merchant habits.",
        order: 1,
    },
    DomainMeta {
        key: "spending_trends",
        name: "Spending Trends",
        description: "Month-over-month or category shifts.",
        order: 2,
    },
    DomainMeta {
        key: "financial_health",
        name: "Financial Health",
        description: "Balances, fees, and cash buffers.",
        order: 3,
    },
    DomainMeta {
        key: "optimization_rewards",
        name: "Optimization & Rewards",
        description: "Opportunities to save or earn more.",
        order: 4,
    },
    DomainMeta {
        key: "behavior_lifestyle",
        name: "Behavior & Lifestyle",
        description: "Time-based or habit insights.",
        order: 5,
    },
    DomainMeta {
        key: "sustainability_local",
        name: "Sustainability & Local Impact",
        description: "Local businesses and ethical spending.",
        order: 6,
    },
    DomainMeta {
        key: "income_cashflow",
        name: "Income & Cashflow",
        description: "Deposits, paycheck patterns, and gaps.",
        order: 7,
    },
    DomainMeta {
        key: "long_term_goals",
        name: "Long-Term Goals",
        description: "Savings milestones and planning.",
        order: 8,
    },
];

macro_rules! family {
    ($key:literal, $domain:literal, $name:literal, $description:literal) => {
        FamilyMeta {
            key: $key,
            domain: $domain,
            name: $name,
            description: $description,
        }
    };
}

pub const FAMILIES: &[FamilyMeta] = &[
    family!("burst_spending", "spending_patterns", "Burst Spending", "Short windows of unusually dense activity."),
    family!("category_spike", "spending_trends", "Category Spike", "Significant increase in category spending."),
    family!("delivery_vs_grocery", "spending_patterns", "Delivery vs Groceries", "Delivery costs compared to grocery spending."),
    family!("habit_frequency", "behavior_lifestyle", "Habit Frequency", "Repeated discretionary habits."),
    family!("merchant_switching", "spending_patterns", "Merchant Switching", "Shifts between similar merchants."),
    family!("favorite_merchants", "spending_patterns", "Favorite Merchants", "High-frequency merchants."),
    family!("lapsed_favorites", "behavior_lifestyle", "Lapsed Favorites", "Merchants you haven't visited recently."),
    family!("subscription_volume", "optimization_rewards", "Subscription Volume", "Recurring subscriptions overview."),
    family!("cost_drift", "spending_patterns", "Cost Drift", "Average spend that slowly increases."),
    family!("subscription_price_change", "spending_trends", "Subscription Price Change", "Subscription cost adjustments."),
    family!("duplicate_subscription", "optimization_rewards", "Duplicate Subscription", "Potential overlapping subscriptions."),
    family!("category_saturation", "spending_patterns", "Category Saturation", "Single category dominates total spending."),
    family!("category_volatility", "spending_patterns", "Category Volatility", "Large month-to-month category swings."),
    family!("consistency_score", "spending_patterns", "Consistency Score", "Predictability of monthly spending."),
    family!("cash_buffer", "financial_health", "Cash Buffer", "Checking vs savings opportunity."),
    family!("balance_warning", "financial_health", "Balance Warning", "Low account balances."),
    family!("fee_detection", "financial_health", "Fee Detection", "ATM or maintenance fees."),
    family!("merchant_loyalty", "optimization_rewards", "Merchant Loyalty Opportunity", "Frequent merchants with loyalty options."),
    family!("merchant_bundling", "optimization_rewards", "Merchant Bundling", "Similar merchants that could be consolidated."),
    family!("high_frequency_small", "optimization_rewards", "High-Frequency Small Purchases", "Frequent micro-purchases that could be batched."),
    family!("category_subscription_opportunity", "optimization_rewards", "Category Subscription Opportunity", "Category spend that resembles a membership."),
    family!("payment_method_optimization", "optimization_rewards", "Payment Method Optimization", "Large transactions better suited for bonus rewards."),
    family!("duplicate_services", "optimization_rewards", "Duplicate Services", "Multiple services offering the same benefit."),
    family!("category_trend", "spending_trends", "Category Trend Shift", "Category spending increase or decrease."),
    family!("weekend_pattern", "behavior_lifestyle", "Weekend Pattern", "Weekend vs weekday spending."),
    family!("time_of_day_pattern", "behavior_lifestyle", "Time of Day Pattern", "Spending concentrated in specific hours."),
    family!("cross_user_affinity", "behavior_lifestyle", "Cross-User Affinity Recommendations", "People with similar habits also enjoy these merchants or categories."),
    family!("transportation_mix", "behavior_lifestyle", "Transportation Mix", "Rideshare and parking behaviors."),
    family!("local_support", "sustainability_local", "Local Support", "Spending at local businesses."),
    family!("local_shop_loyalty", "sustainability_local", "Local Shop Loyalty", "Repeat visits to local merchants."),
    family!("low_waste_trend", "sustainability_local", "Low-Waste Trend", "Secondhand or thrift purchases."),
    family!("air_travel_footprint", "sustainability_local", "Air Travel Footprint", "Airline spending as a carbon signal."),
    family!("seasonal_local_support", "sustainability_local", "Seasonal Local Support", "Local share shift month-to-month."),
    family!("income_pattern", "income_cashflow", "Income Pattern", "Recurring deposits and cashflow gaps."),
    family!("savings_milestone", "long_term_goals", "Savings Milestone", "Progress toward savings goals."),
    family!("restaurant_comeback", "behavior_lifestyle", "Restaurant Comeback", "Suggests revisiting spots you haven't been to in a while."),
    family!("favorite_restaurant_push", "behavior_lifestyle", "Favorite Restaurant Suggestion", "Highlights a favorite dining spot and reminds you to enjoy it again."),
];

pub fn domain(key: &str) -> Option<&'static DomainMeta> {
    DOMAINS.iter().find(|d| d.key == key)
}

pub fn family(key: &str) -> Option<&'static FamilyMeta> {
    FAMILIES.iter().find(|f| f.key == key)
}

/// Domain keys in display order
pub fn domain_order() -> Vec<String> {
    let mut domains: Vec<&DomainMeta> = DOMAINS.iter().collect();
    domains.sort_by_key(|d| d.order);
    domains.into_iter().map(|d| d.key.to_string()).collect()
}

/// Display name for a domain, `snake_case` keys title-cased when unknown
pub fn domain_name(key: &str) -> String {
    domain(key)
        .map(|d| d.name.to_string())
        .unwrap_or_else(|| title_case(key))
}

/// Display name for a family, `snake_case` keys title-cased when unknown
pub fn family_name(key: &str) -> String {
    family(key)
        .map(|f| f.name.to_string())
        .unwrap_or_else(|| title_case(key))
}

pub fn domain_description(key: &str) -> &'static str {
    domain(key).map(|d| d.description).unwrap_or("")
}

pub fn family_description(key: &str) -> &'static str {
    family(key).map(|f| f.description).unwrap_or("")
}

/// "cash_buffer" -> "Cash Buffer"
pub fn title_case(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
