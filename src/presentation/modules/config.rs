use crate::infrastructure::config::AppContext;
use crate::infrastructure::files::tail_lines;
use crate::presentation::modules::Module;
use crate::presentation::printer::{self, HeadingLevel};
use anyhow::Result;
use async_trait::async_trait;

const CONFIG_TAIL_LINES: usize = 100;

/// `hc config`
pub struct ConfigModule;

#[async_trait]
impl Module for ConfigModule {
    fn name(&self) -> &'static str {
        "config"
    }

    fn description(&self) -> &'static str {
        "Displays the location of the config file and the contents (up to 100 lines)."
    }

    fn logo(&self) -> &'static str {
        "🛠️"
    }

    fn usage(&self) -> String {
        self.name().to_string()
    }

    async fn execute(&self, ctx: &AppContext, _args: &[String]) -> Result<()> {
        let path = &ctx.paths.api_config_file;
        printer::print("Config File Location", HeadingLevel::Header2);
        printer::print(&path.display().to_string(), HeadingLevel::NormalText);

        match tail_lines(path, CONFIG_TAIL_LINES) {
            Ok(lines) => {
                printer::print("Config File Contents", HeadingLevel::Header2);
                for line in lines {
                    printer::print(&line, HeadingLevel::NormalText);
                }
            }
            Err(err) => printer::print(
                &format!("Error opening config file: {err}"),
                HeadingLevel::NormalText,
            ),
        }
        Ok(())
    }
}
