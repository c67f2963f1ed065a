// ==========================================
// BREEAM & LEED 认证看板 - 命令行入口
// ==========================================
// 职责: 解析命令 → 组装 AppState → 调用页面 API → 渲染表格
// ==========================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;

use breeam_leed_monitor::api::{
    BreeamApi, BreeamExpiredApi, LeedApi, PageView, RecordDetail, HOME_PAGE,
};
use breeam_leed_monitor::app::{load_config, AppState};
use breeam_leed_monitor::domain::EvaluatedRecord;
use breeam_leed_monitor::engine::ExpiryView;
use breeam_leed_monitor::geocode::NominatimGeocoder;
use breeam_leed_monitor::registry::HttpTransport;
use breeam_leed_monitor::{i18n, logging};

type Breeam = BreeamApi<HttpTransport>;
type BreeamExpired = BreeamExpiredApi<NominatimGeocoder>;
type Leed = LeedApi<NominatimGeocoder>;

/// BREEAM & LEED certification expiry dashboard
#[derive(Parser, Debug)]
#[command(name = "breeam-leed-monitor", version, about)]
struct Cli {
    /// Reference date (YYYY-MM-DD), defaults to the local date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// UI language (pl / en)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// In-use BREEAM certifications from the registry API
    BreeamApi {
        /// Country filter (defaults to Poland when listed)
        #[arg(long)]
        country: Option<String>,

        /// Scheme ID (defaults to the first in-use scheme)
        #[arg(long)]
        scheme_id: Option<String>,

        /// Project types to keep (repeatable)
        #[arg(long = "project-type")]
        project_types: Vec<String>,

        /// Expiry view: all, expired, urgent, warning, caution, ok, no_date
        #[arg(long, default_value = "all")]
        view: String,

        /// Show the detail of the N-th row (1-based)
        #[arg(long)]
        detail: Option<usize>,
    },

    /// Expired BREEAM certifications from the spreadsheet
    BreeamExpired {
        /// Show the detail of the N-th row (1-based)
        #[arg(long)]
        detail: Option<usize>,

        /// Manual address tried first when geocoding the detail
        #[arg(long)]
        address: Option<String>,
    },

    /// LEED certifications from the project directory spreadsheet
    Leed {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        version: Option<String>,

        #[arg(long, default_value = "all")]
        view: String,

        #[arg(long)]
        detail: Option<usize>,
    },

    /// Submit feedback
    Feedback {
        #[arg(long)]
        name: String,

        #[arg(short, long)]
        message: String,

        #[arg(long, default_value = HOME_PAGE)]
        page: String,
    },

    /// Export feedback.csv (admin code required)
    AdminExport {
        #[arg(long)]
        code: String,

        /// Target file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = load_config();
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }
    let state = AppState::new(config)?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    tracing::info!(version = breeam_leed_monitor::VERSION, today = %today, "启动");

    match cli.command {
        Command::BreeamApi {
            country,
            scheme_id,
            project_types,
            view,
            detail,
        } => {
            let api = &state.breeam_api;
            let countries = api.country_options()?;
            let country =
                country.or_else(|| default_option(&countries.options, countries.default_index));
            let scheme_id = match scheme_id {
                Some(id) => Some(id),
                None => {
                    let schemes = api.scheme_options()?;
                    default_option(&schemes.options, schemes.default_index).map(|s| s.scheme_id)
                }
            };

            let records = api.fetch(country.as_deref(), scheme_id.as_deref(), today)?;
            let options = Breeam::project_types(&records);
            let selected = (!project_types.is_empty())
                .then(|| Breeam::sanitize_selection(&project_types, &options));

            let view = parse_view(&view)?;
            let page = Breeam::view(&records, selected.as_deref(), view);
            render_page(&page, cli.json)?;

            let visible = view.apply(Breeam::select(&records, selected.as_deref()));
            if let Some(record) = pick(&visible, detail)? {
                render_detail(&Breeam::detail(record), cli.json)?;
            }
        }

        Command::BreeamExpired { detail, address } => {
            let api = &state.breeam_expired_api;
            let records = api.load(today)?;
            render_page(&BreeamExpired::view(&records), cli.json)?;

            if let Some(record) = pick(&records, detail)? {
                render_detail(&api.detail(record, address.as_deref()), cli.json)?;
            }
        }

        Command::Leed {
            country,
            version,
            view,
            detail,
        } => {
            let api = &state.leed_api;
            let records = api.load(today)?;

            let countries = Leed::country_options(&records);
            let country =
                country.or_else(|| default_option(&countries.options, countries.default_index));

            let view = parse_view(&view)?;
            let page = Leed::view(&records, country.as_deref(), version.as_deref(), view);
            render_page(&page, cli.json)?;

            let filtered = Leed::select(&records, country.as_deref(), version.as_deref());
            let visible = view.apply(filtered);
            if let Some(record) = pick(&visible, detail)? {
                render_detail(&api.detail(record), cli.json)?;
            }
        }

        Command::Feedback {
            name,
            message,
            page,
        } => {
            let entry = state.home_api.submit_feedback(
                &name,
                &message,
                &page,
                Local::now().naive_local(),
            )?;
            println!("{} ({})", i18n::t("feedback.saved").green(), entry.timestamp);
        }

        Command::AdminExport { code, output } => {
            let session = state.home_api.unlock_admin(&code)?;
            match state.home_api.export_feedback(&session)? {
                None => println!("{}", i18n::t("admin.no_feedback").yellow()),
                Some(bytes) => match output {
                    Some(path) => {
                        std::fs::write(&path, &bytes)
                            .with_context(|| format!("无法写入 {}", path.display()))?;
                        println!("{} {}", i18n::t("admin.exported").green(), path.display());
                    }
                    None => print!("{}", String::from_utf8_lossy(&bytes)),
                },
            }
        }
    }

    Ok(())
}

fn default_option<T: Clone>(options: &[T], index: Option<usize>) -> Option<T> {
    index.and_then(|i| options.get(i).cloned())
}

fn parse_view(s: &str) -> Result<ExpiryView> {
    ExpiryView::from_str(s).with_context(|| format!("unknown view: {}", s))
}

/// 第 N 行（从 1 开始）对应的记录
fn pick(records: &[EvaluatedRecord], index: Option<usize>) -> Result<Option<&EvaluatedRecord>> {
    let Some(index) = index else {
        return Ok(None);
    };
    index
        .checked_sub(1)
        .and_then(|i| records.get(i))
        .map(Some)
        .with_context(|| format!("row {} out of range (1..={})", index, records.len()))
}

fn render_page(page: &PageView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    for notice in &page.notices {
        println!("{}", notice.yellow());
    }

    let summary = page
        .summary
        .counts
        .iter()
        .map(|c| format!("{}: {}", c.label, c.count))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{} | {}", page.summary.total.to_string().bold(), summary);
    println!();

    for (i, row) in page.rows.iter().enumerate() {
        let line = format!(
            "{:>4}  {:<40}  {:<10}  {:>5}  {:<16}  {}",
            i + 1,
            truncate(&row.name, 40),
            row.expiry_date.as_deref().unwrap_or("-"),
            row.months_to_expiry
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            row.bucket_label,
            row.project_type
                .as_deref()
                .or(row.version_tag.as_deref())
                .unwrap_or(""),
        );
        match row.bucket_color.as_deref().and_then(hex_to_rgb) {
            Some((r, g, b)) => println!("{}", line.black().on_truecolor(r, g, b)),
            None => println!("{}", line),
        }
    }
    Ok(())
}

fn render_detail(detail: &RecordDetail, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(detail)?);
        return Ok(());
    }

    println!();
    println!("{}", detail.row.name.bold());
    if let Some(identity) = &detail.identity {
        println!("  ID:       {}", identity);
    }
    println!("  Address:  {}", detail.address);
    if let Some(url) = &detail.public_url {
        println!("  URL:      {}", url);
    }
    if let Some(location) = &detail.location {
        println!(
            "  Location: {:.5}, {:.5} ({})",
            location.latitude, location.longitude, location.matched
        );
    }
    if let Some(notice) = &detail.notice {
        println!("  {}", notice.yellow());
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// "#rrggbb" → (r, g, b)
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
