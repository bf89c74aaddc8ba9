fn main() -> anyhow::Result<()> {
    buildbench::run()
}
