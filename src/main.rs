//! OSI Cryptogram entry point
//!
//! Native: a line-oriented terminal front end over the engine.
//! Web: the engine is driven through `osi_cryptogram::web` bindings instead.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};

    use argh::FromArgs;
    use osi_cryptogram::cipher::HintOutcome;
    use osi_cryptogram::passages::osi_layers;
    use osi_cryptogram::platform::FileStore;
    use osi_cryptogram::{AnswerResult, Session, Settings};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    #[derive(FromArgs)]
    /// Solve the seven OSI layers, one cryptogram at a time.
    pub struct Args {
        /// directory where progress and settings are saved
        #[argh(option, short = 'd', default = "String::from(\".osi-cryptogram\")")]
        save_dir: String,

        /// seed for the cipher alphabets (random when omitted)
        #[argh(option, short = 's')]
        seed: Option<u64>,

        /// ignore any saved progress and generate new puzzles
        #[argh(switch)]
        fresh: bool,
    }

    const HELP: &str = "Commands:
  <cipher> <plain>   guess a letter, e.g. `q e`
  clear <cipher>     remove a guess
  hint               reveal the next vowel
  check              check your answer
  reset              clear every guess in this puzzle
  go <n>             switch to puzzle n (1-7)
  next               go to the first unsolved puzzle
  list               show all puzzles
  restart            forget all progress
  show               redraw the puzzle
  quit";

    type Game = Session<FileStore>;

    fn render(session: &Game) {
        let index = session.current_index();
        let Some(view) = session.puzzle(index) else {
            return;
        };
        println!("\n{}. {}", view.id, view.name);
        println!("\n  {}", view.encrypted_text);
        println!("  {}", session.candidate(index).unwrap_or_default());

        let ranked: Vec<String> = view
            .frequency
            .ranked()
            .iter()
            .map(|(c, n)| format!("{c}:{n}"))
            .collect();
        println!("\nFrequencies: {}", ranked.join(" "));

        let conflicts = session.conflicts(index);
        if !conflicts.is_empty() {
            let shown: Vec<String> = conflicts
                .iter()
                .map(|(plain, ciphers)| {
                    let ciphers: String = ciphers.iter().collect();
                    format!("{plain}<-{ciphers}")
                })
                .collect();
            println!("Conflicts: {}", shown.join(" "));
        }
        println!("{} vowel hints left", session.hints_remaining(index));
    }

    fn list(session: &Game) {
        for i in 0..session.puzzle_count() {
            let Some(view) = session.puzzle(i) else {
                continue;
            };
            let marker = if i == session.current_index() { '>' } else { ' ' };
            let status = if session.state().solved_ids().contains(&view.id) {
                "solved"
            } else if session.is_unlocked(i) {
                ""
            } else {
                "locked"
            };
            println!("{marker} {}. {} {status}", view.id, view.name);
        }
    }

    /// Run one command. Returns false when the player quits.
    fn dispatch(session: &mut Game, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        let index = session.current_index();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => return false,
            ["help"] => println!("{HELP}"),
            ["show"] => render(session),
            ["list"] => list(session),
            ["hint"] => match session.request_hint(index) {
                Ok(HintOutcome::Revealed(v)) => {
                    println!("Vowel revealed: {v}");
                    render(session);
                }
                Ok(HintOutcome::NoHintsRemain) => println!("No unrevealed vowels remain"),
                Err(e) => println!("{e}"),
            },
            ["check"] => match session.check_answer(index) {
                Ok(AnswerResult::Solved { plaintext }) => {
                    println!("\nSolved!\n\n{plaintext}");
                    if session.all_solved() {
                        println!("\nAll seven layers decoded. `restart` to play again.");
                    } else {
                        println!("\n`next` for the next puzzle.");
                    }
                }
                Ok(AnswerResult::Wrong) => println!("Wrong answer"),
                Err(e) => println!("{e}"),
            },
            ["reset"] => {
                if let Err(e) = session.clear_all(index) {
                    println!("{e}");
                }
                render(session);
            }
            ["restart"] => {
                session.restart_all();
                render(session);
            }
            ["next"] => match session.go_to_next_unsolved() {
                Some(_) => render(session),
                None => println!("Every puzzle is solved."),
            },
            ["go", n] => match n.parse::<usize>() {
                Ok(n) if n >= 1 => match session.switch_puzzle(n - 1) {
                    Ok(()) => render(session),
                    Err(e) => println!("{e}"),
                },
                _ => println!("Usage: go <1-{}>", session.puzzle_count()),
            },
            ["clear", cipher] => match cipher.chars().next() {
                Some(c) if cipher.chars().count() == 1 => {
                    match session.clear_guess(index, c) {
                        Ok(()) => render(session),
                        Err(e) => println!("{e}"),
                    }
                }
                _ => println!("Usage: clear <letter>"),
            },
            [cipher, plain] if cipher.chars().count() == 1 => {
                let c = cipher.chars().next().unwrap_or(' ');
                match session.input(index, c, plain) {
                    Ok(()) => {
                        render(session);
                        if session.check_solved(index) {
                            println!("\nSolved! `next` for the next puzzle.");
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            _ => println!("Unknown command, try `help`"),
        }
        true
    }

    pub fn run(args: Args) -> io::Result<()> {
        let store = FileStore::new(&args.save_dir);
        let settings = Settings::load(&store);
        let seed = args.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Puzzles seeded with {}", seed);

        let mut session = if args.fresh {
            Session::fresh(osi_layers(), store, Pcg32::seed_from_u64(seed), settings)
        } else {
            Session::with_seed(osi_layers(), store, seed, settings)
        };

        println!("OSI Cryptogram. Type `help` for commands.");
        render(&session);

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            print!("\n> ");
            stdout.flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            if !dispatch(&mut session, line.trim()) {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("OSI Cryptogram (native) starting...");

    let args: terminal::Args = argh::from_env();
    if let Err(e) = terminal::run(args) {
        log::error!("Terminal error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point lives in osi_cryptogram::web, this is just to satisfy the compiler
}
