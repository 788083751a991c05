mod assets;
mod card;
mod config;
mod error;
mod logging;
mod media;
mod mpris;
mod page;
mod runtime;
mod signal;
mod ui;
mod viewport;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
