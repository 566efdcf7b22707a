use appforge_cli::{command, execute, invocation, telemetry};

#[tokio::main]
async fn main() {
    let matches = command().get_matches();
    let Some((invocation, log)) = invocation(&matches) else {
        eprintln!("unknown command");
        std::process::exit(2);
    };
    telemetry::init(log);

    match execute(&invocation).await {
        Ok(output) => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
