//! Example writing every iteration to a log file.

use falsify::*;

fn main() -> std::result::Result<(), FalsifyError> {
    let path = std::env::temp_dir().join("falsify-log-file-example.log");

    let result = for_all(int())
        .hook(LogFile::create(&path)?)
        .with_config(Config::default().with_tests(20))
        .run(|&n| n.checked_mul(2).is_some())?;

    println!("{result}");
    println!("Iterations written to {}", path.display());
    Ok(())
}
