use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use model_guidance::db::Database;
use model_guidance::detection::{
    classify_with_grace, format_message, should_skip_dialog, GuidanceMessage,
    ModelDetectionResult, RefreshTimestamps,
};
use model_guidance::guidance::{load_detection_settings, DetectionSettings, GuidanceSession};
use model_guidance::model::parse_model_ref;
use model_guidance::{now_ms, ModelCatalog, StaticCatalog};
use serde::Serialize;

#[derive(Debug, Default)]
struct Options {
    snapshot: Option<PathBuf>,
    db_path: Option<PathBuf>,
    last_shown_ms_ago: Option<i64>,
    refreshed_ms_ago: HashMap<String, i64>,
    min_interval_ms: Option<u64>,
    refresh_grace_ms: Option<u64>,
    enable: Vec<(String, String)>,
    disable: Vec<(String, String)>,
    mark_shown: bool,
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    result: &'a ModelDetectionResult,
    show_dialog: bool,
    message: Option<&'a GuidanceMessage>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("model_guidance=info,warn")),
        )
        .init();

    if let Err(error) = run() {
        eprintln!("model guidance failed: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1))? else {
        print_help();
        return Ok(());
    };

    let snapshot = options
        .snapshot
        .as_ref()
        .ok_or_else(|| "--snapshot is required".to_string())?;
    let mut catalog = StaticCatalog::from_path(snapshot).map_err(|e| e.to_string())?;
    for (provider, model) in &options.enable {
        catalog
            .set_model_enabled(provider, model, true)
            .map_err(|e| e.to_string())?;
    }
    for (provider, model) in &options.disable {
        catalog
            .set_model_enabled(provider, model, false)
            .map_err(|e| e.to_string())?;
    }

    let now = now_ms();
    let (result, show_dialog) = match options.db_path.as_ref() {
        Some(path) => evaluate_with_store(&catalog, path, &options, now)?,
        None => evaluate_detached(&catalog, &options, now)?,
    };
    let message = show_dialog.then(|| format_message(&result));

    if options.json {
        let report = Report {
            result: &result,
            show_dialog,
            message: message.as_ref(),
        };
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to render report: {e}"))?;
        println!("{rendered}");
    } else {
        print_text_report(&result, message.as_ref());
    }
    Ok(())
}

/// Timing state comes from the persisted session in `path`. Timing flags
/// override it for this run only; only `--mark-shown` writes back.
fn evaluate_with_store(
    catalog: &StaticCatalog,
    path: &Path,
    options: &Options,
    now: i64,
) -> Result<(ModelDetectionResult, bool), String> {
    let db = Arc::new(Database::open(path).map_err(|e| e.to_string())?);
    let mut settings = load_detection_settings(&db).map_err(|e| e.to_string())?;
    apply_overrides(&mut settings, options);
    settings.validate().map_err(|e| e.to_string())?;

    let session = GuidanceSession::new(db);
    let mut refreshed = session.refresh_timestamps().map_err(|e| e.to_string())?;
    refreshed.extend(refreshed_from_flags(options, now));
    let last_shown = match options.last_shown_ms_ago {
        Some(ago) => Some(now - ago),
        None => session.last_dialog_shown_at().map_err(|e| e.to_string())?,
    };

    let (result, show) = evaluate(catalog, &settings, &refreshed, last_shown, now)?;
    if show && options.mark_shown {
        session
            .set_last_dialog_shown_at(now)
            .map_err(|e| e.to_string())?;
        tracing::info!(state = %result.state, "recorded guidance dialog as shown");
    }
    Ok((result, show))
}

/// Timing state comes only from the command line.
fn evaluate_detached(
    catalog: &StaticCatalog,
    options: &Options,
    now: i64,
) -> Result<(ModelDetectionResult, bool), String> {
    let mut settings = DetectionSettings::default();
    settings.apply_env_overrides();
    apply_overrides(&mut settings, options);
    settings.validate().map_err(|e| e.to_string())?;

    let refreshed = refreshed_from_flags(options, now);
    let last_shown = options.last_shown_ms_ago.map(|ago| now - ago);
    evaluate(catalog, &settings, &refreshed, last_shown, now)
}

fn evaluate(
    catalog: &StaticCatalog,
    settings: &DetectionSettings,
    refreshed: &RefreshTimestamps,
    last_shown: Option<i64>,
    now: i64,
) -> Result<(ModelDetectionResult, bool), String> {
    let providers = catalog.providers().map_err(|e| e.to_string())?;
    let result = classify_with_grace(
        &providers,
        catalog,
        (!refreshed.is_empty()).then_some(refreshed),
        now,
        settings.refresh_grace_ms,
    )
    .map_err(|e| e.to_string())?;

    let show = settings.guidance_enabled
        && !should_skip_dialog(&result, last_shown, settings.min_dialog_interval_ms, now);
    Ok((result, show))
}

fn refreshed_from_flags(options: &Options, now: i64) -> RefreshTimestamps {
    options
        .refreshed_ms_ago
        .iter()
        .map(|(provider, ago)| (provider.clone(), now - ago))
        .collect()
}

fn apply_overrides(settings: &mut DetectionSettings, options: &Options) {
    if let Some(value) = options.min_interval_ms {
        settings.min_dialog_interval_ms = value;
    }
    if let Some(value) = options.refresh_grace_ms {
        settings.refresh_grace_ms = value;
    }
}

fn print_text_report(result: &ModelDetectionResult, message: Option<&GuidanceMessage>) {
    println!("state: {}", result.state);
    println!(
        "enabled providers: {}, enabled models: {}",
        result.enabled_providers_count, result.enabled_models_count
    );
    for detail in &result.provider_details {
        println!(
            "  {:<20} {:<8} models {}/{}{}",
            detail.provider_id,
            if detail.is_enabled { "enabled" } else { "disabled" },
            detail.enabled_models_count,
            detail.total_models_count,
            if detail.is_first_time_setup { " (first-time setup)" } else { "" }
        );
    }
    if !result.suggested_actions.is_empty() {
        println!("suggested:");
        for action in &result.suggested_actions {
            println!("  - {}", action.label());
        }
    }
    match message {
        Some(message) => {
            println!();
            println!("{}", message.title);
            println!("{}", message.message);
            for label in message.action_labels() {
                println!("  [{label}]");
            }
        }
        None => println!("dialog: suppressed"),
    }
}

/// Returns `None` when help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(None);
        }
        if arg == "--json" {
            options.json = true;
            continue;
        }
        if arg == "--mark-shown" {
            options.mark_shown = true;
            continue;
        }

        let inline = arg
            .split_once('=')
            .filter(|(flag, _)| flag.starts_with("--"))
            .map(|(flag, value)| (flag.to_string(), value.to_string()));
        let (flag, value) = match inline {
            Some(pair) => pair,
            None => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("{arg} requires a value"))?;
                (arg.clone(), value)
            }
        };

        match flag.as_str() {
            "--snapshot" => options.snapshot = Some(PathBuf::from(value)),
            "--db" => options.db_path = Some(PathBuf::from(value)),
            "--last-shown-ms-ago" => {
                options.last_shown_ms_ago = Some(parse_non_negative(&value, &flag)?)
            }
            "--refreshed" => {
                let (provider, ago) = value
                    .split_once('=')
                    .ok_or_else(|| format!("--refreshed entry '{value}' must be provider=ms-ago"))?;
                let provider = provider.trim();
                if provider.is_empty() {
                    return Err(format!("--refreshed entry '{value}' has an empty provider"));
                }
                options
                    .refreshed_ms_ago
                    .insert(provider.to_string(), parse_non_negative(ago.trim(), &flag)?);
            }
            "--min-interval-ms" => {
                options.min_interval_ms = Some(parse_non_negative(&value, &flag)? as u64)
            }
            "--refresh-grace-ms" => {
                options.refresh_grace_ms = Some(parse_non_negative(&value, &flag)? as u64)
            }
            "--enable" => options.enable.push(parse_model_flag(&value, &flag)?),
            "--disable" => options.disable.push(parse_model_flag(&value, &flag)?),
            _ => return Err(format!("unknown option '{flag}'. Use --help for usage")),
        }
    }
    if options.mark_shown && options.db_path.is_none() {
        return Err("--mark-shown requires --db".to_string());
    }
    Ok(Some(options))
}

fn parse_non_negative(value: &str, flag: &str) -> Result<i64, String> {
    let parsed = value
        .parse::<i64>()
        .map_err(|_| format!("{flag} expects a non-negative integer, got '{value}'"))?;
    if parsed < 0 {
        return Err(format!("{flag} expects a non-negative integer, got '{value}'"));
    }
    Ok(parsed)
}

fn parse_model_flag(value: &str, flag: &str) -> Result<(String, String), String> {
    parse_model_ref(value).ok_or_else(|| format!("{flag} expects <provider>/<model>, got '{value}'"))
}

fn print_help() {
    println!("Model availability check");
    println!();
    println!("Usage:");
    println!("  model-guidance --snapshot <path> [options]");
    println!();
    println!("Options:");
    println!("  --snapshot <path>             JSON catalog snapshot (required)");
    println!("  --db <path>                   Use and update persisted timing state in this database");
    println!("  --last-shown-ms-ago <n>       Guidance dialog was last shown n ms ago");
    println!("  --refreshed p=<n>             Provider p refreshed its model list n ms ago (repeatable)");
    println!("  --min-interval-ms <n>         Minimum time between dialogs (default: 30000)");
    println!("  --refresh-grace-ms <n>        Empty-list grace after a refresh (default: 5000)");
    println!("  --enable p/m                  Treat model m of provider p as enabled (repeatable)");
    println!("  --disable p/m                 Treat model m of provider p as disabled (repeatable)");
    println!("  --mark-shown                  With --db, record the dialog as shown when it is due");
    println!("  --json                        Print the report as JSON");
}
