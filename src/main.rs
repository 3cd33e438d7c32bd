use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match inner_canvas_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("inner-canvas: {e}");
            ExitCode::FAILURE
        }
    }
}
