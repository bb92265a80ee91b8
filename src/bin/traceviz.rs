//! trace 回放
//!
//! 解析执行 trace，按固定节拍逐个回放事件，并把所有实体的画布合成为 PNG 帧。

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use tracing::{error, info, warn};
use traceviz_rs::session::{PlaybackStats, PngDirSink};
use traceviz_rs::sim::{SimTime, Simulator};
use traceviz_rs::{Session, VizConfig, VizError, VizResult};

#[derive(Debug, Parser)]
#[command(name = "traceviz", about = "回放编译器执行 trace：每个实体一个画布，输出 PNG 帧")]
struct Args {
    /// trace 文本文件
    #[arg(long)]
    trace: PathBuf,

    /// JSON 配置文件（缺失字段取默认值）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 每个坐标单位对应的像素数
    #[arg(long)]
    scale: Option<u32>,

    /// 画布边长（像素）
    #[arg(long)]
    canvas_px: Option<u32>,

    /// Evaluating 标记边长（像素）
    #[arg(long)]
    marker_px: Option<u32>,

    /// tick 间隔（毫秒）
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Realizing 只描边，不清空画布
    #[arg(long)]
    no_clear_on_realize: bool,

    /// 回放结束后从头循环（需要配合 --until-ms）
    #[arg(long)]
    loop_playback: bool,

    /// 运行到多少毫秒（虚拟时间）；缺省运行到回放结束
    #[arg(long)]
    until_ms: Option<u64>,

    /// 按 tick 间隔真实等待
    #[arg(long)]
    realtime: bool,

    /// 输出 PNG 帧的目录
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// 每隔多少个 tick 输出一帧
    #[arg(long)]
    frame_every: Option<u64>,

    /// 结束后重复输出最终帧的次数
    #[arg(long)]
    hold_frames: Option<u32>,

    /// 合成帧网格列数
    #[arg(long)]
    grid_columns: Option<u32>,

    /// 在每个图块左上角写出实体序号
    #[arg(long)]
    label_tiles: bool,

    /// 把解析后的事件写成 JSON 数组
    #[arg(long)]
    events_json: Option<PathBuf>,
}

fn build_config(args: &Args) -> VizResult<VizConfig> {
    let mut cfg = match &args.config {
        Some(path) => VizConfig::from_json_file(path)?,
        None => VizConfig::default(),
    };
    if let Some(scale) = args.scale {
        cfg.scale = scale;
    }
    if let Some(px) = args.canvas_px {
        cfg.canvas_px = px;
    }
    if args.marker_px.is_some() {
        cfg.marker_px = args.marker_px;
    }
    if let Some(ms) = args.tick_ms {
        cfg.tick_ms = ms;
    }
    if args.no_clear_on_realize {
        cfg.clear_on_realize = false;
    }
    if args.loop_playback {
        cfg.loop_playback = true;
    }
    if args.frame_every.is_some() {
        cfg.frame_every = args.frame_every;
    }
    if let Some(n) = args.hold_frames {
        cfg.hold_frames = n;
    }
    if args.grid_columns.is_some() {
        cfg.grid_columns = args.grid_columns;
    }
    if args.label_tiles {
        cfg.label_tiles = true;
    }
    if cfg.loop_playback && args.until_ms.is_none() {
        return Err(VizError::config("loop playback needs --until-ms"));
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: &Args) -> VizResult<PlaybackStats> {
    let cfg = build_config(args)?;
    let mut session = Session::new(cfg)?;
    if let Some(dir) = &args.out_dir {
        session = session.with_sink(Box::new(PngDirSink::new(dir)?));
    }
    session.load_file(&args.trace)?;
    if session.config().label_tiles {
        for (index, entity) in session.entities().iter().enumerate() {
            info!(index, %entity, "图块序号");
        }
    }

    if let Some(path) = &args.events_json {
        let raw = serde_json::to_string_pretty(session.events())?;
        fs::write(path, raw)?;
        info!(path = %path.display(), "事件 JSON 已写出");
    }

    let until = args.until_ms.map(SimTime::from_millis);
    let mut sim = Simulator::default();
    session.start(&mut sim);

    if args.realtime {
        while let Some(at) = sim.next_at() {
            if until.is_some_and(|u| at > u) {
                break;
            }
            thread::sleep(at.since(sim.now()).as_duration());
            sim.step(&mut session);
        }
    } else {
        match until {
            Some(u) => sim.run_until(u, &mut session),
            None => sim.run(&mut session),
        }
    }
    session.cancel(&mut sim);

    println!(
        "done @ {:?}, events={}, entities={}, drawn={}, skipped={}, failed={}, frames={}",
        sim.now(),
        session.events().len(),
        session.entities().len(),
        session.stats().drawn,
        session.stats().skipped,
        session.stats().failed,
        session.stats().frames,
    );
    Ok(session.stats().clone())
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(stats) if stats.frame_errors > 0 => {
            warn!(frame_errors = stats.frame_errors, "部分帧写出失败");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "回放未能开始");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
