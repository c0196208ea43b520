//! Command handlers

use std::path::PathBuf;

use furiwake_app::board_service::new_split_suffix;
use furiwake_app::{BoardService, Config};
use furiwake_domain::service::{
    assign_lots_to_shortage, normalize_split_metadata, BoardController, BoardMode, LotHost,
};
use furiwake_infra::{
    load_inspector_names, load_lots_mapping, load_production_lots, load_shortage_table,
};
use furiwake_store::ChartStore;
use furiwake_types::{Error, OutputFormat, Result};

use crate::cli::{Cli, Commands};
use crate::output::{output_allocations, output_chart};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    let format = cli.format.unwrap_or(config.output_format);
    let chart_path = match cli.chart {
        Some(ref path) => path.clone(),
        None => config.chart_path()?,
    };

    match cli.command {
        Commands::Init { roster } => cmd_init(&config, &chart_path, roster),
        Commands::Show => cmd_show(format, &chart_path),
        Commands::Allocate {
            shortage,
            lots,
            output,
        } => cmd_allocate(format, &shortage, &lots, output),
        Commands::Bind {
            mapping,
            preserve_split_lots,
            roster,
        } => cmd_bind(&config, &chart_path, &mapping, preserve_split_lots, roster),
        Commands::Normalize => cmd_normalize(&chart_path),
        Commands::Split { seat, lot, count } => cmd_split(&chart_path, &seat, &lot, count),
        Commands::Swap { first, second } => cmd_swap(&chart_path, &first, &second),
        Commands::Config {
            show,
            set_chart,
            set_roster,
            set_output,
            reset,
        } => cmd_config(config, show, set_chart, set_roster, set_output, reset),
    }
}

fn roster_names(config: &Config, roster: Option<PathBuf>) -> Result<Vec<String>> {
    let path = roster
        .or_else(|| config.inspector_master_path.clone())
        .ok_or_else(|| {
            Error::Validation(
                "検査員マスタのパスが設定されていません (--roster または config)".to_string(),
            )
        })?;
    load_inspector_names(path)
}

fn cmd_init(config: &Config, chart_path: &PathBuf, roster: Option<PathBuf>) -> Result<()> {
    let names = roster_names(config, roster)?;
    let service = BoardService::open(chart_path, &names)?;
    println!("座席表を用意しました: {}", chart_path.display());
    println!("座席数: {} / 検査員: {}人", service.chart().seats.len(), names.len());
    Ok(())
}

fn cmd_show(format: OutputFormat, chart_path: &PathBuf) -> Result<()> {
    let chart = ChartStore::new(chart_path).load()?;
    output_chart(format, &chart)
}

fn cmd_allocate(
    format: OutputFormat,
    shortage: &PathBuf,
    lots: &PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    let shortage_rows = load_shortage_table(shortage)?;
    let production_lots = load_production_lots(lots)?;
    let rows = assign_lots_to_shortage(&shortage_rows, &production_lots);

    if let Some(path) = output {
        let content = serde_json::to_string_pretty(&rows)?;
        std::fs::write(&path, content)?;
        println!("ロット割り当て結果を書き出しました: {}", path.display());
        println!("ロット割り当て完了: {}件", rows.len());
        return Ok(());
    }
    output_allocations(format, &rows)
}

fn cmd_bind(
    config: &Config,
    chart_path: &PathBuf,
    mapping_path: &PathBuf,
    preserve_split_lots: bool,
    roster: Option<PathBuf>,
) -> Result<()> {
    let mapping = load_lots_mapping(mapping_path)?;
    // a missing or broken chart is rebuilt first; the roster is only
    // needed for that case
    let names = roster_names(config, roster).unwrap_or_default();
    let mut service = BoardService::open(chart_path, &names)?;
    service.rebind(&mapping, preserve_split_lots)?;

    let bound: usize = service
        .chart()
        .seats
        .iter()
        .map(|seat| seat.lots.len())
        .sum();
    println!("ロットを紐づけて保存しました: {}", chart_path.display());
    println!("紐づけロット数: {}件", bound);
    Ok(())
}

fn cmd_normalize(chart_path: &PathBuf) -> Result<()> {
    let store = ChartStore::new(chart_path);
    let mut chart = store.load()?;
    normalize_split_metadata(&mut chart);
    store.save(&chart)?;
    println!("分割メタデータを整理して保存しました: {}", chart_path.display());
    Ok(())
}

fn parse_host(seat: &str) -> LotHost {
    if seat == "unassigned" {
        LotHost::Unassigned
    } else {
        LotHost::Seat(seat.to_string())
    }
}

fn cmd_split(chart_path: &PathBuf, seat: &str, lot: &str, count: u32) -> Result<()> {
    let store = ChartStore::new(chart_path);
    let mut board = BoardController::new(store.load()?);
    board.split_lot(&parse_host(seat), lot, count, &new_split_suffix())?;
    board.normalize();
    store.save(board.chart())?;
    println!("ロット {} を {} 分割しました", lot, count.max(2));
    Ok(())
}

fn cmd_swap(chart_path: &PathBuf, first: &str, second: &str) -> Result<()> {
    let store = ChartStore::new(chart_path);
    let mut board = BoardController::new(store.load()?);
    board.set_mode(BoardMode::SeatEdit);
    board.swap_seats(first, second)?;
    board.normalize();
    store.save(board.chart())?;
    println!("座席 {} と {} の位置を入れ替えました", first, second);
    Ok(())
}

fn cmd_config(
    mut config: Config,
    show: bool,
    set_chart: Option<PathBuf>,
    set_roster: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        config = Config::default();
        config.save()?;
        println!("設定を初期化しました");
    }

    let mut changed = false;
    if let Some(path) = set_chart {
        config.seating_chart_path = Some(path);
        changed = true;
    }
    if let Some(path) = set_roster {
        config.inspector_master_path = Some(path);
        changed = true;
    }
    if let Some(fmt) = set_output {
        config.output_format = fmt;
        changed = true;
    }
    if changed {
        config.save()?;
        println!("設定を保存しました");
    }

    if show || (!changed && !reset) {
        println!("{}", config);
    }
    Ok(())
}
