use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("vpbridge {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: vpbridge");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("VPBRIDGE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: host={}, schema={}, web={}, cli=true",
        cfg!(feature = "host"),
        cfg!(feature = "schema"),
        cfg!(feature = "web")
    );
    println!(
        "default_origin: {}",
        vpbridge_protocol::DEFAULT_TRUSTED_ORIGIN
    );

    Ok(SUCCESS)
}
