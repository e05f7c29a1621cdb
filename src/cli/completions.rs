use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    qdsm completions bash > ~/.bash_completion.d/qdsm\n\n\
                  Generate zsh completions:\n    qdsm completions zsh > ~/.zfunc/_qdsm\n\n\
                  Generate fish completions:\n    qdsm completions fish > ~/.config/fish/completions/qdsm.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
