//! End-to-end interpreter scenarios driven through the [Machine] facade.
use z80tools::{CpuFlags, CpuStateDelta, Machine};

/// A Z80 copy loop: LD A,B; OR C; RET Z; LD A,(DE); LD (HL),A; INC DE;
/// INC HL; DEC BC; JP loop.
const COPY_LOOP: [u8; 11] = [
    0x78, 0xB1, 0xC8, 0x1A, 0x77, 0x13, 0x23, 0x0B, 0xC3, 0x00, 0x10
];

/// A 16-bit restoring division of BC by DE: quotient in BC, remainder in HL.
const DIVISION: [u8; 23] = [
    0x21, 0x00, 0x00,       // LD HL,0
    0x3E, 0x10,             // LD A,16
    0xCB, 0x21,             // loop: SLA C
    0xCB, 0x10,             // RL B
    0xED, 0x6A,             // ADC HL,HL
    0xED, 0x52,             // SBC HL,DE
    0x38, 0x03,             // JR C,restore
    0x0C,                   // INC C
    0x18, 0x01,             // JR next
    0x19,                   // restore: ADD HL,DE
    0x3D,                   // next: DEC A
    0x20, 0xEF,             // JR NZ,loop
    0xC9,                   // RET
];

const DATA: [u8; 10] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA];

#[test]
fn block_copy_program() {
    let mut machine = Machine::new();
    machine.load_executable(&COPY_LOOP, 0x1000, true).unwrap();
    machine.load_data(&DATA, 0x2000, false).unwrap();
    machine.set_cpu_state(CpuStateDelta {
        de: Some(0x2000),
        hl: Some(0x3000),
        bc: Some(0x0010),
        sp: Some(0x4000),
        ..CpuStateDelta::default()
    });
    machine.execute().unwrap();
    assert_eq!(machine.dump_memory(0x3000, 16), machine.dump_memory(0x2000, 16));
    assert_eq!(machine.dump_memory(0x3000, 10), &DATA);
    let state = machine.cpu_state();
    assert_eq!(state.bc, 0);
    assert_eq!(state.de, 0x2010);
    assert_eq!(state.hl, 0x3010);
    // the final RET Z fired at call depth zero and restored the stack pointer
    assert_eq!(state.sp, 0x4002);
}

#[test]
fn division_program() {
    let mut machine = Machine::new();
    machine.load_executable(&DIVISION, 0x0000, true).unwrap();
    machine.set_cpu_state(CpuStateDelta {
        bc: Some(0xC5D4),  // 50644
        de: Some(0x001B),  // 27
        sp: Some(0x4000),
        ..CpuStateDelta::default()
    });
    machine.execute().unwrap();
    let state = machine.cpu_state();
    assert_eq!(state.bc, 0x0753, "quotient");
    assert_eq!(state.hl, 0x0013, "remainder");
}

#[test]
fn division_program_small_operands() {
    let mut machine = Machine::new();
    machine.load_executable(&DIVISION, 0x0000, true).unwrap();
    machine.set_cpu_state(CpuStateDelta {
        bc: Some(0x3264),  // 12900
        de: Some(0x001B),  // 27
        sp: Some(0x4000),
        ..CpuStateDelta::default()
    });
    machine.execute().unwrap();
    let state = machine.cpu_state();
    assert_eq!(state.bc, 477);
    assert_eq!(state.hl, 21);
}

#[test]
fn add_a_e_sets_the_documented_flags() {
    let mut machine = Machine::new();
    machine.load_executable(&[0x83], 0, true).unwrap();  // ADD A,E
    machine.set_cpu_state(CpuStateDelta {
        af: Some(0x1200),
        de: Some(0x0070),
        ..CpuStateDelta::default()
    });
    machine.execute().unwrap();
    let state = machine.cpu_state();
    assert_eq!(state.af >> 8, 0x82);
    let flags = CpuFlags::from_bits_truncate(state.af as u8);
    assert!(flags.sf());
    assert!(!flags.zf());
    assert!(!flags.hf());
    assert!(flags.pvf(), "0x12 + 0x70 = 0x82 crosses 0x7F");
    assert!(!flags.nf());
    assert!(!flags.cf());
}

#[test]
fn ldir_advances_all_three_pairs() {
    let mut machine = Machine::new();
    machine.load_executable(&[0xED, 0xB0], 0x0000, true).unwrap();  // LDIR
    machine.load_data(&DATA, 0x2000, false).unwrap();
    machine.set_cpu_state(CpuStateDelta {
        hl: Some(0x2000),
        de: Some(0x3000),
        bc: Some(DATA.len() as u16),
        ..CpuStateDelta::default()
    });
    machine.execute().unwrap();
    let state = machine.cpu_state();
    assert_eq!(machine.dump_memory(0x3000, DATA.len()), &DATA);
    assert_eq!(state.bc, 0);
    assert_eq!(state.hl, 0x2000 + DATA.len() as u16);
    assert_eq!(state.de, 0x3000 + DATA.len() as u16);
    let flags = CpuFlags::from_bits_truncate(state.af as u8);
    assert!(!flags.pvf());
}

#[test]
fn push_pop_round_trips_for_many_values() {
    use z80tools::{stack, Cpu, Memory};
    let mut cpu = Cpu::default();
    let mut memory = Memory::new();
    for (value, sp) in [(0u16, 2u16), (1, 3), (0x4050, 0x2000), (0xFFFF, 0xFFFE), (0xABCD, 2)] {
        cpu.set_sp(sp);
        stack::push(&mut cpu, &mut memory, value);
        assert_eq!(stack::pop(&mut cpu, &memory), value);
        assert_eq!(cpu.get_sp(), sp);
    }
}

#[test]
fn execute_one_single_steps() {
    let mut machine = Machine::new();
    machine.load_executable(&[0x3E, 0x05, 0x3C, 0x3C], 0, true).unwrap();
    machine.execute_one().unwrap();
    assert_eq!(machine.cpu_state().af >> 8, 0x05);
    assert_eq!(machine.cpu_state().pc, 2);
    machine.execute_one().unwrap();
    assert_eq!(machine.cpu_state().af >> 8, 0x06);
    machine.execute_one().unwrap();
    assert_eq!(machine.cpu_state().af >> 8, 0x07);
    assert_eq!(machine.cpu_state().pc, 4);
}

#[test]
fn nested_calls_only_end_the_run_at_depth_zero() {
    // CALL sub1 ; RET             (the outer RET ends the run)
    // sub1: CALL sub2 ; RET
    // sub2: RET
    let program = [
        0xCD, 0x04, 0x10,   // 0x1000 CALL 1004h
        0xC9,               // 0x1003 RET
        0xCD, 0x08, 0x10,   // 0x1004 CALL 1008h
        0xC9,               // 0x1007 RET
        0xC9,               // 0x1008 RET
    ];
    let mut machine = Machine::new();
    machine.load_executable(&program, 0x1000, true).unwrap();
    machine.set_cpu_state(CpuStateDelta { sp: Some(0x8000), ..CpuStateDelta::default() });
    machine.execute().unwrap();
    // every call returned and the last RET popped the empty-stack sentinel
    assert_eq!(machine.cpu_state().sp, 0x8002);
}
