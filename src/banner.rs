// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
     _ _       _          _
  __| (_) __ _| |__   ___| |_ ___  ___
 / _` | |/ _` | '_ \ / _ \ __/ _ \/ __|
| (_| | | (_| | |_) |  __/ ||  __/\__ \
 \__,_|_|\__,_|_.__/ \___|\__\___||___/

    Diabetes Risk Assessment Form
"#;
    println!("{}", banner);
}
