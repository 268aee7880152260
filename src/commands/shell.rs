use clap::{Command, ValueEnum};
use clap_complete::{Shell as CompleteShell, generate};
use std::io::{self, Write};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Prints a `shep` shell function that changes into the worktree `shep new` creates
pub fn generate_shell_integration(shell: Shell) {
    print!("{}", shell_integration(shell));
}

/// Generate native shell completions using clap
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    write_completions(shell, cmd, &mut io::stdout());
}

pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let clap_shell = match shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
    };

    generate(clap_shell, cmd, cmd.get_name().to_string(), out);
}

/// Wrapper source for `shell`
#[must_use]
pub fn shell_integration(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_INTEGRATION,
        Shell::Zsh => ZSH_INTEGRATION,
        Shell::Fish => FISH_INTEGRATION,
    }
}

// `shep new` prints the worktree path as its last stdout line
const BASH_INTEGRATION: &str = r#"# Shep shell integration for Bash
# Add to ~/.bashrc: eval "$(shep shell-init bash)"

shep() {
    if [ "$1" = "new" ]; then
        local output status target
        output=$(command shep "$@" | tee /dev/tty; exit "${PIPESTATUS[0]}")
        status=$?
        target=$(printf '%s\n' "$output" | tail -n 1)
        if [ $status -eq 0 ] && [ -d "$target" ]; then
            cd "$target" || return 1
        fi
        return $status
    fi
    command shep "$@"
}
"#;

const ZSH_INTEGRATION: &str = r#"# Shep shell integration for Zsh
# Add to ~/.zshrc: eval "$(shep shell-init zsh)"

shep() {
    if [[ "$1" == "new" ]]; then
        local output exit_code target
        output=$(command shep "$@" | tee /dev/tty; exit "${pipestatus[1]}")
        exit_code=$?
        target=${output##*$'\n'}
        if [[ $exit_code -eq 0 && -d "$target" ]]; then
            cd "$target" || return 1
        fi
        return $exit_code
    fi
    command shep "$@"
}
"#;

const FISH_INTEGRATION: &str = r#"# Shep shell integration for Fish
# Add to ~/.config/fish/config.fish: shep shell-init fish | source

function shep
    if test "$argv[1]" = new
        set -l output (command shep $argv | tee /dev/tty)
        set -l exit_code $pipestatus[1]
        set -l target $output[-1]
        if test $exit_code -eq 0; and test -d "$target"
            cd $target
        end
        return $exit_code
    end
    command shep $argv
end
"#;
