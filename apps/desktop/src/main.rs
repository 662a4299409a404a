fn main() -> anyhow::Result<()> {
    word_review_lib::run()
}
