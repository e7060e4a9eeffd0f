use crate::infrastructure::config::AppContext;
use crate::infrastructure::files::tail_lines;
use crate::presentation::modules::Module;
use crate::presentation::printer::{self, HeadingLevel};
use anyhow::Result;
use async_trait::async_trait;

const LOG_TAIL_LINES: usize = 20;

/// `hc log`
pub struct LogModule;

#[async_trait]
impl Module for LogModule {
    fn name(&self) -> &'static str {
        "log"
    }

    fn description(&self) -> &'static str {
        "Displays the location of the log file and the last 20 lines."
    }

    fn logo(&self) -> &'static str {
        "📝"
    }

    fn usage(&self) -> String {
        self.name().to_string()
    }

    async fn execute(&self, ctx: &AppContext, _args: &[String]) -> Result<()> {
        let path = &ctx.paths.log_file;
        printer::print("Log File Location", HeadingLevel::Header2);
        printer::print(&path.display().to_string(), HeadingLevel::NormalText);

        match tail_lines(path, LOG_TAIL_LINES) {
            Ok(lines) => {
                printer::print("Log File Contents", HeadingLevel::Header2);
                for line in lines {
                    printer::print(&line, HeadingLevel::NormalText);
                }
            }
            Err(err) => printer::print(
                &format!("Error opening log file: {err}"),
                HeadingLevel::NormalText,
            ),
        }
        Ok(())
    }
}
