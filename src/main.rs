use log::{error, info};
use granite_probe::{
  run_suite, ClientConfig, Credentials, GraniteClient, TEST_QUESTIONS
};

#[tokio::main]
async fn main() -> Result<(), granite_probe::Error>
{   env_logger::init();

    let credentials = Credentials::from_env()
      .map_err(|e| {
        error!("{}", e);
        e
      })?;
    let config = ClientConfig::from_env()?;

    let mut client = GraniteClient::new(credentials, config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let report = run_suite(&mut client, &TEST_QUESTIONS, &mut out).await?;
    info!("{} of {} questions answered",
      report.replies, report.total());
    Ok(())
}
