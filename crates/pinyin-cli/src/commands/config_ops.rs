use std::fs;
use std::process;

use pinyin_core::shuangpin::ShuangpinScheme;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Read a custom keyboard scheme, exiting on any error.
pub(crate) fn load_scheme(file: &str) -> ShuangpinScheme {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(ShuangpinScheme::from_toml(&content), "Error in {file}: {}")
}

pub fn scheme_export() {
    print!("{}", pinyin_core::shuangpin::default_toml());
}

pub fn scheme_validate(file: &str) {
    let scheme = load_scheme(file);
    println!(
        "OK: {} initials, {} finals",
        scheme.num_initials(),
        scheme.num_finals()
    );
}

pub fn settings_export() {
    print!("{}", pinyin_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        pinyin_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: {} layers (base {}), {} ranges",
        s.layers.len(),
        s.layers[0].name,
        s.ranges().len()
    );
}
