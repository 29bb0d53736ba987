fn main() {
    let _ = dotenvy::dotenv();

    if let Err(err) = nier_audio_search::run() {
        eprintln!("{err:#}");
        std::process::exit(nier_audio_search::exit_code(&err));
    }
}
