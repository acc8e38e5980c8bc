use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gallows::args::{Args, Command, ExportKind};
use gallows::engine::GameEngine;
use gallows::stats::StatsAggregator;
use gallows::store::{
    self, FileHistoryStore, FilePlayerStore, FileWordStore, HistoryStore, PlayerStore, WordStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = match args.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            dir
        }
        None => store::default_data_dir()?,
    };

    let file_appender = tracing_appender::rolling::never(&data_dir, "gallows.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let words: Arc<dyn WordStore> = Arc::new(FileWordStore::new(data_dir.join("words.txt"))?);
    let players: Arc<dyn PlayerStore> =
        Arc::new(FilePlayerStore::new(data_dir.join("scoreboard.txt"))?);
    let history: Arc<dyn HistoryStore> =
        Arc::new(FileHistoryStore::new(data_dir.join("history.txt"))?);

    let stats = StatsAggregator::new(Arc::clone(&players), Arc::clone(&history));

    if let Some(Command::Export { what }) = args.command {
        return export(&stats, what);
    }

    info!(data_dir = %data_dir.display(), "gallows started");
    let mut engine = GameEngine::new(Arc::clone(&words), players, history);
    menu_loop(&mut engine, &stats, words.as_ref())
}

fn export(stats: &StatsAggregator, what: ExportKind) -> Result<()> {
    let json = match what {
        ExportKind::History => serde_json::to_string_pretty(&stats.recent_games(usize::MAX)?)?,
        ExportKind::Ranking => serde_json::to_string_pretty(&stats.ranking(None)?)?,
        ExportKind::Stats => serde_json::to_string_pretty(&stats.global_stats()?)?,
    };
    println!("{json}");
    Ok(())
}

fn menu_loop(
    engine: &mut GameEngine,
    stats: &StatsAggregator,
    words: &dyn WordStore,
) -> Result<()> {
    loop {
        println!();
        println!("1) single player");
        println!("2) two players");
        println!("3) ranking");
        println!("4) recent games");
        println!("5) statistics");
        println!("6) add word");
        println!("q) quit");

        match prompt("> ")?.as_str() {
            "1" => start_single_player(engine)?,
            "2" => start_multiplayer(engine)?,
            "3" => show_ranking(stats)?,
            "4" => show_recent_games(stats)?,
            "5" => show_statistics(stats)?,
            "6" => add_word(words)?,
            "q" => break,
            other => println!("unknown option: {other}"),
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok("q".to_string()); // EOF
    }
    Ok(line.trim().to_string())
}

fn start_single_player(engine: &mut GameEngine) -> Result<()> {
    let name = prompt("player name: ")?;
    match engine.start_single_player(&name) {
        Ok(_) => play(engine),
        Err(err) => {
            println!("{err}");
            Ok(())
        }
    }
}

fn start_multiplayer(engine: &mut GameEngine) -> Result<()> {
    let chooser = prompt("player 1 (chooses the word): ")?;
    let guesser = prompt("player 2 (guesses): ")?;
    let word = prompt("secret word (at least 3 letters): ")?;
    match engine.start_multiplayer(&chooser, &guesser, &word) {
        Ok(_) => play(engine),
        Err(err) => {
            println!("{err}");
            Ok(())
        }
    }
}

fn play(engine: &mut GameEngine) -> Result<()> {
    loop {
        let Some(session) = engine.current_session() else {
            return Ok(());
        };
        println!();
        println!("word: {}", spaced(&session.masked_word()));
        println!(
            "wrong letters: [{}]   attempts left: {}",
            letters(&session.wrong_letters()),
            session.remaining_attempts()
        );

        let input = prompt("letter (q to abandon): ")?;
        if input.eq_ignore_ascii_case("q") {
            engine.reset();
            return Ok(());
        }

        match engine.submit_guess(&input) {
            Ok(report) => {
                println!("{}", report.message);
                if report.game_over {
                    if report.won {
                        println!("you won! the word was {}", report.session.word());
                    } else {
                        println!("you lost. the word was {}", report.session.word());
                    }
                    engine.reset();
                    return Ok(());
                }
            }
            Err(err) => {
                println!("{err}");
                return Ok(());
            }
        }
    }
}

fn show_ranking(stats: &StatsAggregator) -> Result<()> {
    let ranking = stats.ranking(Some(10))?;
    if ranking.is_empty() {
        println!("no games played yet");
        return Ok(());
    }
    for (i, player) in ranking.iter().enumerate() {
        println!("{:2}. {player}", i + 1);
    }
    Ok(())
}

fn show_recent_games(stats: &StatsAggregator) -> Result<()> {
    let games = stats.recent_games(20)?;
    if games.is_empty() {
        println!("no games played yet");
        return Ok(());
    }
    for game in games {
        println!("{game}");
    }
    Ok(())
}

fn show_statistics(stats: &StatsAggregator) -> Result<()> {
    let name = prompt("player name (blank for global): ")?;
    if name.is_empty() {
        let global = stats.global_stats()?;
        println!(
            "games: {}   wins: {}   losses: {}   win rate: {:.1}%",
            global.total_games, global.wins, global.losses, global.win_rate
        );
        println!(
            "avg wrong attempts: {:.1}   avg duration: {:.0}s",
            global.average_attempts, global.average_duration
        );
        return Ok(());
    }

    let player = stats.player_stats(&name)?;
    println!(
        "games: {}   wins: {}   losses: {}   win rate: {:.1}%",
        player.total_games, player.wins, player.losses, player.win_rate
    );
    if let Some(best) = player.best_performance {
        println!("best win: {best}");
    }
    if let Some(rank) = stats.player_rank(&name)? {
        println!("rank: #{rank}");
    }
    Ok(())
}

fn add_word(words: &dyn WordStore) -> Result<()> {
    let word = prompt("new word: ")?;
    if words.add(&word)? {
        println!("added");
    } else {
        println!("rejected: words must be alphabetic and not already known");
    }
    Ok(())
}

fn spaced(masked: &str) -> String {
    masked
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn letters(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
