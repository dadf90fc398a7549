use std::env;
use std::sync::Once;

/// Print the program banner (only prints once)
pub fn print_banner() {
	static PRINT_BANNER_ONCE: Once = Once::new();
	PRINT_BANNER_ONCE.call_once(|| {
		eprintln!("------------------------------------------------------------------------");
		eprintln!("  S.T.A.G. (Simulated Three-dimensional Aerosol Geometries): Spherify");
		eprintln!("  original vs spherified dipole lattices");
		eprintln!("------------------------------------------------------------------------\n");
	});
}

/// Print compilation information (only prints once)
pub fn print_compile_info() {
	static PRINT_COMPILE_ONCE: Once = Once::new();
	PRINT_COMPILE_ONCE.call_once(|| {
		let program_name = env::current_exe()
		.ok()
		.as_ref()
		.and_then(|path| path.file_name())
		.and_then(|name| name.to_str())
		.unwrap_or(env!("CARGO_PKG_NAME"))
		.to_string();

		eprintln!("Program: {} v{}", program_name, env!("CARGO_PKG_VERSION"));
		eprintln!("Compiled on: {} at {}\n", env!("COMPILE_DATE"), env!("COMPILE_TIME"));
	});
}
