fn main() {
    neuroreport_lib::run()
}
