fn main() -> anyhow::Result<()> {
    rotor_demos::run(rotor_demos::presets::camera())
}
