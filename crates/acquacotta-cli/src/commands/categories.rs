use acquacotta_client::PomodoroType;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for category in PomodoroType::ALL {
        println!("{}  {}", category.color(), category.label());
    }
    Ok(())
}
