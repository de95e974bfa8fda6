//! 步态命令
//!
//! 运行小跑或爬行步态。Ctrl+C 在下一个子动作边界生效，机器人随后回到中位角。

use super::{GlobalOptions, build_controller, load_config};
use anyhow::{Context, Result};
use clap::Args;
use quad_client::{GaitController, GaitFamily, GaitReport};
use quad_driver::Actuator;

/// 步态命令参数
#[derive(Args, Debug)]
pub struct WalkCommand {
    /// 步态（trot 或 crawl）
    #[arg(short, long, default_value = "trot")]
    pub gait: GaitFamily,

    /// 每个子动作的插值步数（默认取标定文件中的值）
    #[arg(short, long)]
    pub steps: Option<u32>,

    /// 运行的周期数（不指定时一直运行到 Ctrl+C）
    #[arg(long)]
    pub cycles: Option<u32>,

    /// 跳过确认
    #[arg(short, long)]
    pub yes: bool,
}

impl WalkCommand {
    pub fn execute(&self, options: &GlobalOptions) -> Result<()> {
        let config = load_config(options)?;
        let mut controller = build_controller(&config)?;
        let steps = self.steps.unwrap_or_else(|| controller.default_step_count(self.gait));

        println!("🦿 步态: {}", self.gait);
        println!("  插值步数: {}", steps);
        match self.cycles {
            Some(cycles) => println!("  周期数: {}", cycles),
            None => println!("  周期数: 持续运行（Ctrl+C 停止）"),
        }

        if !self.yes && !confirm()? {
            println!("❌ 操作已取消");
            return Ok(());
        }

        println!("⏳ 初始化站立姿态...");
        controller.initialize().context("初始化站立姿态失败")?;

        let stop = controller.stop_handle();
        ctrlc::set_handler(move || {
            eprintln!("\n🛑 收到中断信号，完成当前动作后回到中位角...");
            stop.stop();
        })
        .context("设置信号处理失败")?;

        let report = run(&mut controller, self.gait, steps, self.cycles)?;
        print_report(&report);
        Ok(())
    }
}

/// 运行步态直到完成指定周期数或收到停止信号
pub fn run<A: Actuator>(
    controller: &mut GaitController<A>,
    gait: GaitFamily,
    steps: u32,
    cycles: Option<u32>,
) -> Result<GaitReport> {
    let report = match cycles {
        Some(cycles) => controller.walk(gait, steps, cycles),
        None => controller.start_gait(gait, steps),
    }
    .with_context(|| format!("{} 步态运行失败", gait))?;
    Ok(report)
}

fn confirm() -> Result<bool> {
    // ✅ 使用 inquire 提供更好的交互体验
    let confirmed = inquire::Confirm::new("机器人将开始行走，确定要继续吗？")
        .with_default(false) // 默认为 No（安全优先）
        .prompt()
        .map_err(|e| anyhow::anyhow!("用户交互失败: {}", e))?;
    Ok(confirmed)
}

fn print_report(report: &GaitReport) {
    if report.interrupted {
        println!("🛑 步态已中断");
    } else {
        println!("✅ 步态完成");
    }
    println!("  相位: {}", report.phases_completed);
    println!("  子动作: {}", report.actions_completed);
    println!("  舵机命令: {}", report.commands_sent);
    println!("✅ 已回到中位角");
}
