//! Dashboard Fixtures
//!
//! The mock values the dashboard renders. Nothing here is loaded from or
//! written to storage; `DashboardData::sample()` is the whole data source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::format_percentages;

/// Signed-in user shown in the navbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    pub role: Role,
    pub email: String,
}

impl CurrentUser {
    pub fn sample() -> Self {
        Self {
            name: "Admin Kantin".to_string(),
            role: Role::Admin,
            email: "admin@canteen.app".to_string(),
        }
    }
}

/// Canteen roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Kasir,
    Pelanggan,
    Koki,
}

impl Role {
    /// Label shown under the user name
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Kasir => "Kasir",
            Role::Pelanggan => "Pelanggan",
            Role::Koki => "Koki",
        }
    }

    /// Text of the sidebar role tab
    pub fn tab_label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Kasir => "Kasir",
            Role::Pelanggan => "Pelanggan",
            Role::Koki => "Koki",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "kasir" => Ok(Role::Kasir),
            "pelanggan" => Ok(Role::Pelanggan),
            "koki" => Ok(Role::Koki),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Headline counters for the stat cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub revenue: i64,
    pub orders: i64,
    pub customers: i64,
    pub menu_active: u32,
    pub menu_total: u32,
    pub pending: i64,
    pub completed: i64,
    pub new_customers: i64,
    pub top_selling: i64,
}

impl DashboardStats {
    /// "38/42" style active-menu counter
    pub fn menu_label(&self) -> String {
        format!("{}/{}", self.menu_active, self.menu_total)
    }
}

/// Labelled series for the revenue line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl RevenueSeries {
    pub fn weekly() -> Self {
        Self {
            labels: ["Sen", "Sel", "Rab", "Kam", "Jum", "Sab", "Min"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            values: vec![
                1_200_000, 1_900_000, 1_500_000, 2_200_000, 1_800_000, 2_500_000, 2_100_000,
            ],
        }
    }

    pub fn total(&self) -> i64 {
        self.values.iter().sum()
    }
}

/// One slice of the warung distribution donut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarungShare {
    pub label: String,
    pub value: u32,
    pub color: String,
}

/// Sales share per warung
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarungDistribution {
    pub shares: Vec<WarungShare>,
}

impl WarungDistribution {
    pub fn sample() -> Self {
        let rows = [
            ("Kantin Utama", 35, "#3B82F6"),
            ("Kantin Minuman", 25, "#10B981"),
            ("Kantin Snack", 15, "#8B5CF6"),
            ("Kantin Bakso", 10, "#F59E0B"),
            ("Kantin Soto", 8, "#EF4444"),
            ("Kantin Mie", 7, "#06B6D4"),
        ];
        Self {
            shares: rows
                .iter()
                .map(|(label, value, color)| WarungShare {
                    label: label.to_string(),
                    value: *value,
                    color: color.to_string(),
                })
                .collect(),
        }
    }

    /// Display percentages, one decimal, in slice order
    pub fn percentages(&self) -> Vec<String> {
        let values: Vec<u32> = self.shares.iter().map(|s| s.value).collect();
        format_percentages(&values)
    }
}

/// Range selector of the revenue chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartFilter {
    #[default]
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "month")]
    Month,
}

impl ChartFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartFilter::SevenDays => "7days",
            ChartFilter::ThirtyDays => "30days",
            ChartFilter::Month => "month",
        }
    }
}

impl fmt::Display for ChartFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(ChartFilter::SevenDays),
            "30days" => Ok(ChartFilter::ThirtyDays),
            "month" => Ok(ChartFilter::Month),
            other => Err(format!("unknown chart filter: {}", other)),
        }
    }
}

/// Everything the dashboard page displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub revenue: RevenueSeries,
    pub warungs: WarungDistribution,
}

impl DashboardData {
    pub fn sample() -> Self {
        Self {
            stats: DashboardStats {
                revenue: 12_500_000,
                orders: 24,
                customers: 156,
                menu_active: 38,
                menu_total: 42,
                pending: 4,
                completed: 18,
                new_customers: 5,
                top_selling: 45,
            },
            revenue: RevenueSeries::weekly(),
            warungs: WarungDistribution::sample(),
        }
    }

    /// Revenue series for a chart filter
    pub fn revenue_for(&self, filter: ChartFilter, variation: &mut Variation) -> RevenueSeries {
        match filter {
            ChartFilter::SevenDays => self.revenue.clone(),
            ChartFilter::ThirtyDays => RevenueSeries {
                labels: (1..=30).map(|i| format!("Hari {}", i)).collect(),
                values: (0..30)
                    .map(|_| 1_000_000 + variation.next_below(3_000_000))
                    .collect(),
            },
            ChartFilter::Month => RevenueSeries {
                labels: (1..=4).map(|i| format!("Minggu {}", i)).collect(),
                values: vec![4_500_000, 5_200_000, 4_800_000, 5_500_000],
            },
        }
    }

    /// Simulated refresh: bounded jitter on counters and the revenue series
    pub fn refresh(&mut self, variation: &mut Variation) {
        self.stats.revenue += variation.symmetric(500_000);
        self.stats.orders = (self.stats.orders + variation.symmetric(2)).max(0);
        self.stats.customers = (self.stats.customers + variation.symmetric(1)).max(0);
        for value in self.revenue.values.iter_mut() {
            *value = (*value + variation.symmetric(250_000)).max(1_000_000);
        }
    }
}

/// Random source for simulated refresh values
#[derive(Debug, Clone)]
pub struct Variation {
    rng: StdRng,
}

impl Variation {
    /// Reproducible sequence for tests and previews
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform value in `0..bound`, or 0 for an empty range
    pub fn next_below(&mut self, bound: i64) -> i64 {
        if bound <= 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    /// Uniform value in `-span..=span`
    pub fn symmetric(&mut self, span: i64) -> i64 {
        let span = span.abs();
        self.rng.gen_range(-span..=span)
    }
}
