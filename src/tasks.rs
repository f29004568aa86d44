use crate::cmd;
use crate::config::Config;
use crate::context::Context;
use crate::result::Result;
use crate::tpl::Tpl;

/// Task strings with `$NAME` and `$VERSION` resolved
pub fn expand(config: &Config, version: Option<&str>) -> Vec<String> {
    let mut tpl = Tpl::new();
    tpl.register("NAME", &config.name);
    if let Some(version) = version {
        tpl.register("VERSION", version);
    }
    tpl.parse_vec(&config.tasks)
}

/// Run each task through the shell in order, stopping at the first failure
pub fn run(ctx: &Context, tasks: &[String]) -> Result<()> {
    for task in tasks {
        if task.trim().is_empty() {
            continue;
        }
        cmd::shell(ctx, task)?;
    }
    Ok(())
}
