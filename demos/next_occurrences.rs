use chrono::Local;
use chrono_tz::Tz;
use cronplan::parser::{CronParser, Seconds};

// Usage: cargo run --example next_occurrences -- "<pattern>" [count] [time zone]
fn main() {
    let mut args = std::env::args().skip(1);
    let pattern = args.next().unwrap_or_else(|| "*/15 9-17 * * Mon-Fri".to_string());
    let count: usize = args
        .next()
        .map(|count| count.parse().expect("Count must be a number"))
        .unwrap_or(5);
    let timezone: Tz = args
        .next()
        .unwrap_or_else(|| "UTC".to_string())
        .parse()
        .expect("Invalid timezone");

    // Six fields means a leading seconds field
    let seconds = if pattern.split_whitespace().count() == 6 {
        Seconds::Required
    } else {
        Seconds::Disallowed
    };

    let cron = match CronParser::builder().seconds(seconds).build().parse(&pattern) {
        Ok(cron) => cron,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    let now = Local::now().with_timezone(&timezone);
    println!("Pattern \"{pattern}\" is read as \"{cron}\"");
    println!("Next {count} occurrences after {now}:");

    for time in cron.iter_after(now).take(count) {
        println!("{time}");
    }
}
