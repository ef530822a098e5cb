fn main() {
    aurwatch::run_cli();
}
