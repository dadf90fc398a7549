use std::process::Command;

fn stamp(format: &str) -> String {
	Command::new("date")
	.arg(format)
	.output()
	.map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
	.unwrap_or_else(|_| "unknown".to_string())
}

fn main() {
	println!("cargo:rustc-env=COMPILE_DATE={}", stamp("+%Y-%m-%d"));
	println!("cargo:rustc-env=COMPILE_TIME={}", stamp("+%H:%M:%S"));
	println!("cargo:rerun-if-changed=build.rs");
}
