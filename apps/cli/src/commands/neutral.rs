//! 回中位命令

use super::{GlobalOptions, build_controller, load_config};
use anyhow::{Context, Result};
use clap::Args;

/// 回中位命令参数
#[derive(Args, Debug)]
pub struct NeutralCommand {
    /// 只打印中位角，不下发命令
    #[arg(long)]
    pub dry_run: bool,
}

impl NeutralCommand {
    pub fn execute(&self, options: &GlobalOptions) -> Result<()> {
        let config = load_config(options)?;
        let mut controller = build_controller(&config)?;

        if !self.dry_run {
            println!("⏳ 所有关节回到中位角...");
            // 新进程没有上一次的指令角度，直接下发中位角
            controller.initialize().context("下发中位角失败")?;
        }

        for (joint, spec) in controller.model().joints.iter() {
            println!(
                "  {:<5} ch{:>2}: {:>6.1}°  [{:.0}, {:.0}]",
                joint.to_string(),
                spec.channel,
                controller.angles()[joint],
                spec.min,
                spec.max
            );
        }

        if !self.dry_run {
            println!("✅ 已回到中位角");
        }
        Ok(())
    }
}
