//! Dashboard page: stat cards, charts, warung list and quick actions
//!
//! Charts are not drawn here. Each chart canvas carries its model as
//! JSON in a `data-chart` attribute, which is what a renderer consumes.

use async_trait::async_trait;
use serde::Serialize;

use crate::app::{AppContext, QuickAction, UiEvent};
use crate::data::{ChartFilter, DashboardData, RevenueSeries, WarungDistribution};
use crate::document::{escape_text, Document};
use crate::format::{format_currency, format_rupiah_tick, group_thousands};
use crate::registry::{Capabilities, Component, ComponentError, ComponentResult};

const REVENUE_CHART: &str = "revenueChart";
const WARUNG_CHART: &str = "warungChart";

/// Accent color of a stat card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Primary,
    Success,
    Warning,
    Accent,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Primary => "primary",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Accent => "accent",
        }
    }
}

/// Arrow shown under a stat value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    fn class(&self) -> &'static str {
        match self {
            Trend::Up => "trend-up",
            Trend::Down => "trend-down",
        }
    }

    fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "fa-arrow-up",
            Trend::Down => "fa-arrow-down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub trend: String,
    pub direction: Trend,
    pub icon: &'static str,
    pub tone: Tone,
}

impl StatCard {
    /// The four headline cards
    pub fn from_data(data: &DashboardData) -> Vec<StatCard> {
        let stats = &data.stats;
        vec![
            StatCard {
                title: "Pendapatan Bulan Ini",
                value: format_currency(stats.revenue),
                trend: "+12.5%".to_string(),
                direction: Trend::Up,
                icon: "fa-coins",
                tone: Tone::Primary,
            },
            StatCard {
                title: "Pesanan Hari Ini",
                value: stats.orders.to_string(),
                trend: format!("{} selesai", stats.completed),
                direction: Trend::Down,
                icon: "fa-shopping-cart",
                tone: Tone::Success,
            },
            StatCard {
                title: "Total Pelanggan",
                value: stats.customers.to_string(),
                trend: format!("+{} baru", stats.new_customers),
                direction: Trend::Up,
                icon: "fa-users",
                tone: Tone::Warning,
            },
            StatCard {
                title: "Menu Aktif",
                value: stats.menu_label(),
                trend: format!("{} terjual", stats.top_selling),
                direction: Trend::Down,
                icon: "fa-utensils",
                tone: Tone::Accent,
            },
        ]
    }

    pub fn render(&self) -> String {
        format!(
            r#"<div class="stat-card {tone}"><div class="stat-header"><div><p class="stat-title">{title}</p><h3 class="stat-value">{value}</h3></div><div class="stat-icon {tone}"><i class="fas {icon}"></i></div></div><div class="stat-trend {trend_class}"><i class="fas {arrow}"></i><span>{trend}</span></div></div>"#,
            tone = self.tone.as_str(),
            title = self.title,
            value = escape_text(&self.value),
            icon = self.icon,
            trend_class = self.direction.class(),
            arrow = self.direction.arrow(),
            trend = escape_text(&self.trend),
        )
    }
}

#[derive(Debug, Serialize)]
struct RevenueChartModel<'a> {
    filter: ChartFilter,
    labels: &'a [String],
    values: &'a [i64],
    ticks: Vec<String>,
}

#[derive(Debug, Serialize)]
struct WarungChartModel<'a> {
    labels: Vec<&'a str>,
    values: Vec<u32>,
    colors: Vec<&'a str>,
    percentages: Vec<String>,
}

fn chart_json(model: &impl Serialize, chart: &str) -> ComponentResult<String> {
    serde_json::to_string(model)
        .map_err(|e| ComponentError::failed("dashboard", format!("{} model: {}", chart, e)))
}

fn render_warung_list(warungs: &WarungDistribution) -> String {
    warungs
        .shares
        .iter()
        .zip(warungs.percentages())
        .map(|(share, percentage)| {
            format!(
                r#"<div class="warung-item"><div class="warung-info"><div class="warung-color" style="background: {color}"></div><span class="warung-name">{label}</span></div><div class="warung-stats"><div class="progress-bar"><div class="progress-fill" style="width: {value}%; background: {color}"></div></div><span class="warung-percentage">{percentage}%</span></div></div>"#,
                color = share.color,
                label = escape_text(&share.label),
                value = share.value,
                percentage = percentage,
            )
        })
        .collect()
}

fn set_text_by_id(doc: &mut Document, id: &str, text: &str) {
    if let Some(node) = doc.element_by_id(id) {
        doc.set_text(node, text);
    }
}

/// The dashboard page widget
#[derive(Debug, Default)]
pub struct DashboardComponent {
    filter: ChartFilter,
}

impl DashboardComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> ChartFilter {
        self.filter
    }

    async fn render_stats(&self, ctx: &AppContext) {
        let data = ctx.dashboard.read().await;
        let cards: String = StatCard::from_data(&data).iter().map(StatCard::render).collect();

        let mut doc = ctx.document.write().await;
        if let Some(grid) = doc.element_by_id("statsGrid") {
            doc.set_inner_html(grid, &cards);
        }
        set_text_by_id(&mut doc, "revenueAmount", &format_currency(data.stats.revenue));
        set_text_by_id(&mut doc, "ordersCount", &data.stats.orders.to_string());
        set_text_by_id(&mut doc, "customersCount", &group_thousands(data.stats.customers));
        set_text_by_id(&mut doc, "menuCount", &data.stats.menu_label());
    }

    async fn render_revenue_chart(&self, ctx: &AppContext, series: &RevenueSeries) -> ComponentResult<()> {
        let model = RevenueChartModel {
            filter: self.filter,
            labels: &series.labels,
            values: &series.values,
            ticks: series.values.iter().map(|v| format_rupiah_tick(*v)).collect(),
        };
        let json = chart_json(&model, REVENUE_CHART)?;

        let mut doc = ctx.document.write().await;
        if let Some(canvas) = doc.element_by_id(REVENUE_CHART) {
            doc.set_attr(canvas, "data-chart", &json);
        }
        if let Some(select) = doc.element_by_id("chartFilter") {
            doc.set_attr(select, "data-value", self.filter.as_str());
        }
        Ok(())
    }

    async fn render_warungs(&self, ctx: &AppContext) -> ComponentResult<()> {
        let data = ctx.dashboard.read().await;
        let warungs = &data.warungs;
        let model = WarungChartModel {
            labels: warungs.shares.iter().map(|s| s.label.as_str()).collect(),
            values: warungs.shares.iter().map(|s| s.value).collect(),
            colors: warungs.shares.iter().map(|s| s.color.as_str()).collect(),
            percentages: warungs.percentages(),
        };
        let json = chart_json(&model, WARUNG_CHART)?;
        let list = render_warung_list(warungs);

        let mut doc = ctx.document.write().await;
        if let Some(canvas) = doc.element_by_id(WARUNG_CHART) {
            doc.set_attr(canvas, "data-chart", &json);
        }
        if let Some(node) = doc.element_by_id("warungList") {
            doc.set_inner_html(node, &list);
        }
        Ok(())
    }

    async fn current_series(&self, ctx: &AppContext) -> RevenueSeries {
        let data = ctx.dashboard.read().await;
        let mut variation = ctx.variation.lock().await;
        data.revenue_for(self.filter, &mut variation)
    }

    async fn set_spinning(&self, ctx: &AppContext, spinning: bool) {
        let mut doc = ctx.document.write().await;
        let Some(button) = doc.element_by_id("refreshBtn") else {
            return;
        };
        let icon = doc
            .children(button)
            .iter()
            .copied()
            .find(|&child| doc.element(child).is_some_and(|e| e.tag == "i"));
        if let Some(icon) = icon {
            if spinning {
                doc.add_class(icon, "fa-spin");
            } else {
                doc.remove_class(icon, "fa-spin");
            }
        }
    }

    /// Simulated reload of the dashboard figures
    async fn refresh(&self, ctx: &AppContext) -> ComponentResult<()> {
        self.set_spinning(ctx, true).await;
        tokio::time::sleep(ctx.config.ui.refresh_latency()).await;

        {
            let mut data = ctx.dashboard.write().await;
            let mut variation = ctx.variation.lock().await;
            data.refresh(&mut variation);
        }

        self.render_stats(ctx).await;
        let series = self.current_series(ctx).await;
        self.render_revenue_chart(ctx, &series).await?;
        self.set_spinning(ctx, false).await;

        ctx.toasts.success("Data berhasil diperbarui").await;
        tracing::info!("Dashboard data refreshed");
        Ok(())
    }

    async fn change_filter(&mut self, ctx: &AppContext, filter: ChartFilter) -> ComponentResult<()> {
        self.filter = filter;
        let series = self.current_series(ctx).await;
        self.render_revenue_chart(ctx, &series).await?;
        ctx.toasts.info(format!("Filter diubah ke {}", filter)).await;
        Ok(())
    }

    async fn quick_action(&self, ctx: &AppContext, action: QuickAction) {
        match action {
            QuickAction::AddMenu => {
                ctx.toasts.info("Fitur Tambah Menu akan segera hadir").await;
            }
            QuickAction::ManageOrders => {
                ctx.toasts.info("Membuka halaman Pesanan").await;
                open_page(ctx, "orders").await;
            }
            QuickAction::GenerateReport => {
                ctx.toasts.info("Membuka halaman Laporan").await;
                open_page(ctx, "reports").await;
            }
            QuickAction::ManageUsers => {
                ctx.toasts.info("Fitur Kelola Pengguna akan segera hadir").await;
            }
        }
    }
}

/// Follow a quick action to its page; a missing target is only logged
async fn open_page(ctx: &AppContext, hash: &str) {
    match ctx.navigator.handle_hash(hash).await {
        Ok(true) => {}
        Ok(false) => tracing::debug!(hash, "Quick action target has no page container"),
        Err(e) => tracing::warn!(error = %e, hash, "Quick action target is not a page"),
    }
}

#[async_trait]
impl Component for DashboardComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn mount_point(&self) -> Option<&str> {
        Some("dashboardPage")
    }

    async fn init(&mut self, ctx: &AppContext) -> ComponentResult<()> {
        self.render_stats(ctx).await;
        let series = self.current_series(ctx).await;
        self.render_revenue_chart(ctx, &series).await?;
        self.render_warungs(ctx).await?;
        tracing::debug!("Dashboard component initialized");
        Ok(())
    }

    async fn update(&mut self, ctx: &AppContext, event: &UiEvent) -> ComponentResult<()> {
        match event {
            UiEvent::Refresh => self.refresh(ctx).await,
            UiEvent::ChartFilter(filter) => self.change_filter(ctx, *filter).await,
            UiEvent::QuickAction(action) => {
                self.quick_action(ctx, *action).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn destroy(&mut self, ctx: &AppContext) {
        let mut doc = ctx.document.write().await;
        for chart in [REVENUE_CHART, WARUNG_CHART] {
            if let Some(canvas) = doc.element_by_id(chart) {
                doc.remove_attr(canvas, "data-chart");
            }
        }
        tracing::debug!("Dashboard charts released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, UiConfig};
    use crate::fragment::StaticSource;
    use std::sync::Arc;
    use std::time::Duration;

    const DASHBOARD: &str = include_str!("../../assets/pages/dashboard.html");

    fn context() -> AppContext {
        let config = Config {
            ui: UiConfig::instant(),
            ..Default::default()
        };
        AppContext::new(
            config,
            &format!(
                r#"<section id="dashboardPage" class="page">{}</section><section id="pesananPage" class="page hidden"></section><div id="toastContainer"></div>"#,
                DASHBOARD
            ),
            Arc::new(StaticSource::new()),
        )
        .unwrap()
        .with_seed(11)
    }

    async fn chart(ctx: &AppContext, id: &str) -> Option<serde_json::Value> {
        let doc = ctx.document.read().await;
        let canvas = doc.element_by_id(id)?;
        serde_json::from_str(doc.attr(canvas, "data-chart")?).ok()
    }

    #[test]
    fn test_stat_cards_from_sample() {
        let cards = StatCard::from_data(&DashboardData::sample());
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "Rp 12,5 Jt");
        assert_eq!(cards[1].trend, "18 selesai");
        assert_eq!(cards[2].trend, "+5 baru");
        assert_eq!(cards[3].value, "38/42");
        assert_eq!(cards[3].tone, Tone::Accent);
        assert!(cards[0].render().contains("trend-up"));
        assert!(cards[1].render().contains("fa-arrow-down"));
    }

    #[test]
    fn test_warung_list_percentages() {
        let html = render_warung_list(&WarungDistribution::sample());
        let doc = Document::parse(&html);
        let labels: Vec<String> = doc
            .elements_by_class("warung-percentage")
            .into_iter()
            .map(|n| doc.text_content(n))
            .collect();
        assert_eq!(labels, vec!["35.0%", "25.0%", "15.0%", "10.0%", "8.0%", "7.0%"]);
    }

    #[tokio::test]
    async fn test_init_renders_page() {
        let ctx = context();
        let mut dashboard = DashboardComponent::new();
        dashboard.init(&ctx).await.unwrap();

        {
            let doc = ctx.document.read().await;
            assert_eq!(doc.elements_by_class("stat-card").len(), 4);
            assert_eq!(doc.elements_by_class("warung-item").len(), 6);
            let revenue = doc.element_by_id("revenueAmount").unwrap();
            assert_eq!(doc.text_content(revenue), "Rp 12,5 Jt");
        }

        let revenue = chart(&ctx, REVENUE_CHART).await.unwrap();
        assert_eq!(revenue["filter"], "7days");
        assert_eq!(revenue["labels"][0], "Sen");
        assert_eq!(revenue["ticks"][0], "Rp 1.200.000");

        let warung = chart(&ctx, WARUNG_CHART).await.unwrap();
        assert_eq!(warung["percentages"][5], "7.0");
    }

    #[tokio::test]
    async fn test_chart_filter_swaps_series() {
        let ctx = context();
        let mut dashboard = DashboardComponent::new();
        dashboard.init(&ctx).await.unwrap();

        dashboard
            .update(&ctx, &UiEvent::ChartFilter(ChartFilter::Month))
            .await
            .unwrap();
        assert_eq!(dashboard.filter(), ChartFilter::Month);

        let revenue = chart(&ctx, REVENUE_CHART).await.unwrap();
        assert_eq!(revenue["labels"].as_array().unwrap().len(), 4);
        assert_eq!(revenue["values"][3], 5_500_000);
        assert_eq!(ctx.toasts.messages().await, vec!["Filter diubah ke month"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_waits_for_latency() {
        let mut config = Config::default();
        config.ui.refresh_latency_ms = 1000;
        let ctx = AppContext::new(
            config,
            &format!(r#"<section id="dashboardPage">{}</section>"#, DASHBOARD),
            Arc::new(StaticSource::new()),
        )
        .unwrap()
        .with_seed(5);

        let mut dashboard = DashboardComponent::new();
        dashboard.init(&ctx).await.unwrap();

        let task = {
            let ctx = ctx.clone();
            tokio::spawn(async move { dashboard.update(&ctx, &UiEvent::Refresh).await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        {
            let doc = ctx.document.read().await;
            assert_eq!(doc.elements_by_class("fa-spin").len(), 1);
        }
        assert!(ctx.toasts.messages().await.is_empty());

        task.await.unwrap().unwrap();
        assert!(ctx.document.read().await.elements_by_class("fa-spin").is_empty());
        assert_eq!(ctx.toasts.messages().await, vec!["Data berhasil diperbarui"]);
        assert!(ctx
            .dashboard
            .read()
            .await
            .revenue
            .values
            .iter()
            .all(|v| *v >= 1_000_000));
    }

    #[tokio::test]
    async fn test_quick_actions() {
        let ctx = context();
        let mut dashboard = DashboardComponent::new();

        dashboard
            .update(&ctx, &UiEvent::QuickAction(QuickAction::AddMenu))
            .await
            .unwrap();
        dashboard
            .update(&ctx, &UiEvent::QuickAction(QuickAction::ManageOrders))
            .await
            .unwrap();

        assert_eq!(
            ctx.toasts.messages().await,
            vec!["Fitur Tambah Menu akan segera hadir", "Membuka halaman Pesanan"]
        );
        assert_eq!(ctx.navigator.location().await, "#orders");
        assert!(ctx.navigator.active_pages().await.is_empty());

        dashboard
            .update(&ctx, &UiEvent::QuickAction(QuickAction::GenerateReport))
            .await
            .unwrap();
        assert_eq!(
            ctx.toasts.messages().await.last().map(String::as_str),
            Some("Membuka halaman Laporan")
        );
        assert_eq!(ctx.navigator.location().await, "#reports");
        assert!(ctx.navigator.current().await.is_none());
    }

    #[tokio::test]
    async fn test_destroy_releases_charts() {
        let ctx = context();
        let mut dashboard = DashboardComponent::new();
        dashboard.init(&ctx).await.unwrap();
        dashboard.destroy(&ctx).await;
        assert!(chart(&ctx, REVENUE_CHART).await.is_none());
        assert!(chart(&ctx, WARUNG_CHART).await.is_none());
    }
}
