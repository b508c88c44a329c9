//! Launching ROMs through a configurable external command.

use std::path::Path;
use std::process::Command;

/// Fallback launcher when none is configured.
pub const DEFAULT_COMMAND: &str = "retroarch {rom}";

/// Build the launcher invocation from a command template.
///
/// The template is split on whitespace and every `{rom}` occurrence is
/// replaced with the ROM path. A template without the placeholder gets
/// the path appended as the final argument. Returns `None` for an
/// empty template.
pub fn build_command(template: &str, rom: &Path) -> Option<Command> {
    let rom_str = rom.to_string_lossy();
    let mut seen_placeholder = false;
    let tokens: Vec<String> = template
        .split_whitespace()
        .map(|token| {
            if token.contains("{rom}") {
                seen_placeholder = true;
                token.replace("{rom}", &rom_str)
            } else {
                token.to_string()
            }
        })
        .collect();

    let (program, args) = tokens.split_first()?;
    let mut command = Command::new(program);
    command.args(args);
    if !seen_placeholder {
        command.arg(rom.as_os_str());
    }
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(command: &Command) -> (String, Vec<String>) {
        let program = command.get_program().to_string_lossy().into_owned();
        let args = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        (program, args)
    }

    #[test]
    fn substitutes_placeholder() {
        let command =
            build_command("retroarch -L core.so {rom}", Path::new("/roms/a.sfc")).unwrap();
        let (program, args) = parts(&command);
        assert_eq!(program, "retroarch");
        assert_eq!(args, vec!["-L", "core.so", "/roms/a.sfc"]);
    }

    #[test]
    fn substitutes_inside_longer_token() {
        let command =
            build_command("emu --rom={rom} --fullscreen", Path::new("/roms/b.bin")).unwrap();
        let (_, args) = parts(&command);
        assert_eq!(args, vec!["--rom=/roms/b.bin", "--fullscreen"]);
    }

    #[test]
    fn appends_rom_when_template_has_no_placeholder() {
        let command = build_command("mednafen", Path::new("/roms/c.pce")).unwrap();
        let (program, args) = parts(&command);
        assert_eq!(program, "mednafen");
        assert_eq!(args, vec!["/roms/c.pce"]);
    }

    #[test]
    fn empty_template_is_rejected() {
        assert!(build_command("", Path::new("/roms/d.bin")).is_none());
        assert!(build_command("   ", Path::new("/roms/d.bin")).is_none());
    }
}
