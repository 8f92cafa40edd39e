//! Prints the serialized sizes of keys and ciphertexts per scheme and curve.

use abe::bytestring::ByteString;
use abe::scheme::cpabe::CpAbeContext;
use abe::scheme::kpabe::KpAbeContext;
use abe::{Bls12_381, Bn254, PairingCurve};

fn print_cpabe<E: PairingCurve>(label: &str) {
    let mut rng = rand::thread_rng();
    let mut ctx = CpAbeContext::<E>::new();
    ctx.setup(&mut rng).unwrap();
    ctx.keygen(&mut rng, "student|engineer", "alice").unwrap();

    let ct = ctx
        .encrypt(&mut rng, "student and engineer", b"top secret")
        .unwrap();
    let mut wire = ByteString::new();
    ct.export_with_header(&mut wire);

    println!("cpabe ({label})");
    println!("MPK:\t{}", ctx.keystore().get("MPK").unwrap().body.len());
    println!("MSK:\t{}", ctx.keystore().get("MSK").unwrap().body.len());
    println!("key:\t{}", ctx.keystore().get("alice").unwrap().body.len());
    println!("CT:\t{}\n", wire.len());
}

fn print_kpabe<E: PairingCurve>(label: &str) {
    let mut rng = rand::thread_rng();
    let mut ctx = KpAbeContext::<E>::new();
    ctx.setup(&mut rng).unwrap();
    ctx.keygen(&mut rng, "student and engineer", "alice").unwrap();

    let ct = ctx
        .encrypt(&mut rng, "student|engineer", b"top secret")
        .unwrap();
    let mut wire = ByteString::new();
    ct.export_with_header(&mut wire);

    println!("kpabe ({label})");
    println!("MPK:\t{}", ctx.keystore().get("MPK").unwrap().body.len());
    println!("MSK:\t{}", ctx.keystore().get("MSK").unwrap().body.len());
    println!("key:\t{}", ctx.keystore().get("alice").unwrap().body.len());
    println!("CT:\t{}\n", wire.len());
}

fn main() {
    println!("ABE component sizes in bytes:\n");
    print_cpabe::<Bls12_381>("BLS12-381");
    print_cpabe::<Bn254>("BN-254");
    print_kpabe::<Bls12_381>("BLS12-381");
    print_kpabe::<Bn254>("BN-254");
}
