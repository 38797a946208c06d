use acquacotta_client::{ClientConfig, ClientContext, Settings};
use clap::builder::PossibleValuesParser;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Change one setting
    Set {
        /// Settings field
        #[arg(value_parser = PossibleValuesParser::new(Settings::FIELDS))]
        field: String,
        /// New value
        value: String,
    },
}

pub async fn run(
    action: SettingsAction,
    config: &ClientConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ClientContext::from_config(config)?;
    // Fail loud: `set` must never write defaults over the stored settings.
    let mut settings = ctx.commands.get_settings().await?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set { field, value } => {
            settings.set_field(&field, &value)?;
            ctx.settings.update(settings).await?;
            println!("ok");
        }
    }
    Ok(())
}
