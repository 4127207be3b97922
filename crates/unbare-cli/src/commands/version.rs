use miette::{IntoDiagnostic, Result};
use unbare_core::version::VersionInfo;

pub fn run(json: bool) -> Result<()> {
    let info = VersionInfo::current();
    if json {
        let out = serde_json::to_string_pretty(&info).into_diagnostic()?;
        println!("{out}");
    } else {
        println!("{info}");
    }
    Ok(())
}
