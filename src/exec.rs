/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! The executor: one dispatch arm per handler id.
//!
//! Handlers recover register, bit and condition indices from bit fields of
//! the op-code byte. Memory operands are resolved through
//! [indexed_address], which yields `IX+d`, `IY+d` or `HL` according to the
//! instruction prefix; this is what lets a single handler serve the `(HL)`,
//! `(IX+d)` and `(IY+d)` forms alike.
pub mod ops;

use crate::cpu::{
    bit_number, restart_target, Condition, Cpu, CpuFlags, InterruptMode,
    Ops8, Prefix, Reg8, Reg16, Rot, StkReg16,
};
use crate::decode::DecodedInstruction;
use crate::memory::Memory;
use crate::port::PortBus;
use crate::stack;
use crate::tables::{self, Handler};

/// Control flow state owned by the run loop.
///
/// Every executed `CALL` (including a taken conditional one) increases the
/// call depth and every `RET` family instruction decreases it; a `RET` at
/// depth zero raises `end_of_run`, which lets programs that finish with a
/// plain `RET` return control cleanly.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Flow {
    pub call_depth: u32,
    pub end_of_run: bool,
}

/// Returns the memory operand address of the instruction: `IX+d` or `IY+d`
/// when an index prefix is in effect, `HL` otherwise.
pub(crate) fn indexed_address(cpu: &Cpu, inst: &DecodedInstruction) -> u16 {
    let base = cpu.get_index16(inst.prefix);
    match inst.disp {
        Some(d) if inst.prefix.has_index() => base.wrapping_add(d as i16 as u16),
        _ => base
    }
}

fn read_operand8(cpu: &Cpu, memory: &Memory, inst: &DecodedInstruction, code: u8) -> u8 {
    match Reg8::from_code(code) {
        Some(reg) => cpu.get_reg(reg),
        None => memory.read(indexed_address(cpu, inst))
    }
}

fn write_operand8(cpu: &mut Cpu, memory: &mut Memory, inst: &DecodedInstruction, code: u8, val: u8) {
    match Reg8::from_code(code) {
        Some(reg) => cpu.set_reg(reg, val),
        None => memory.write(indexed_address(cpu, inst), val)
    }
}

fn alu8(cpu: &mut Cpu, op: Ops8, val: u8) {
    let mut flags = cpu.get_flags();
    let acc = cpu.get_acc();
    let carry = flags.cf();
    let res = match op {
        Ops8::ADD => ops::add8(acc, val, false, &mut flags),
        Ops8::ADC => ops::add8(acc, val, carry, &mut flags),
        Ops8::SUB => ops::sub8(acc, val, false, &mut flags),
        Ops8::SBC => ops::sub8(acc, val, carry, &mut flags),
        Ops8::AND => ops::and(acc, val, &mut flags),
        Ops8::XOR => ops::xor(acc, val, &mut flags),
        Ops8::OR  => ops::or(acc, val, &mut flags),
        Ops8::CP  => {
            ops::cmp8(acc, val, &mut flags);
            acc
        }
    };
    cpu.set_acc(res);
    cpu.set_flags(flags);
}

fn ret(cpu: &mut Cpu, memory: &Memory, flow: &mut Flow) {
    if flow.call_depth == 0 {
        flow.end_of_run = true;
    }
    else {
        flow.call_depth -= 1;
    }
    let pc = stack::pop(cpu, memory);
    cpu.set_pc(pc);
}

fn call(cpu: &mut Cpu, memory: &mut Memory, flow: &mut Flow, target: u16) {
    let ret_pc = cpu.get_pc();
    stack::push(cpu, memory, ret_pc);
    cpu.set_pc(target);
    flow.call_depth += 1;
}

fn jump_relative(cpu: &mut Cpu, disp: i8) {
    let pc = cpu.get_pc().wrapping_add(disp as i16 as u16);
    cpu.set_pc(pc);
}

/// A single load step of the `LDI`/`LDD` group. Returns the value of `BC`
/// after the decrement.
fn block_load(cpu: &mut Cpu, memory: &mut Memory, delta: i8) -> u16 {
    let hl = cpu.get_reg16(Reg16::HL, Prefix::None);
    let de = cpu.get_reg16(Reg16::DE, Prefix::None);
    memory.write(de, memory.read(hl));
    let step = delta as i16 as u16;
    cpu.set_reg16(Reg16::HL, Prefix::None, hl.wrapping_add(step));
    cpu.set_reg16(Reg16::DE, Prefix::None, de.wrapping_add(step));
    let bc = cpu.get_reg16(Reg16::BC, Prefix::None).wrapping_sub(1);
    cpu.set_reg16(Reg16::BC, Prefix::None, bc);
    let mut flags = cpu.get_flags();
    flags.remove(CpuFlags::H|CpuFlags::N);
    flags.set(CpuFlags::PV, bc != 0);
    cpu.set_flags(flags);
    bc
}

/// A single compare step of the `CPI`/`CPD` group. Returns `BC` after the
/// decrement; Z reports equality.
fn block_compare(cpu: &mut Cpu, memory: &Memory, delta: i8) -> u16 {
    let hl = cpu.get_reg16(Reg16::HL, Prefix::None);
    let val = memory.read(hl);
    cpu.set_reg16(Reg16::HL, Prefix::None, hl.wrapping_add(delta as i16 as u16));
    let bc = cpu.get_reg16(Reg16::BC, Prefix::None).wrapping_sub(1);
    cpu.set_reg16(Reg16::BC, Prefix::None, bc);
    let mut flags = cpu.get_flags();
    let carry = flags.cf();
    ops::cmp8(cpu.get_acc(), val, &mut flags);
    flags.set(CpuFlags::PV, bc != 0);
    flags.set(CpuFlags::C, carry);
    cpu.set_flags(flags);
    bc
}

/// A single input step of the `INI`/`IND` group. Returns `B` after the
/// decrement.
fn block_in(cpu: &mut Cpu, memory: &mut Memory, port: &mut dyn PortBus, delta: i8) -> u8 {
    let bc = cpu.get_reg16(Reg16::BC, Prefix::None);
    let hl = cpu.get_reg16(Reg16::HL, Prefix::None);
    memory.write(hl, port.read(bc));
    cpu.set_reg16(Reg16::HL, Prefix::None, hl.wrapping_add(delta as i16 as u16));
    let b = cpu.get_reg(Reg8::B).wrapping_sub(1);
    cpu.set_reg(Reg8::B, b);
    block_io_flags(cpu, b);
    b
}

/// A single output step of the `OUTI`/`OUTD` group. Returns `B` after the
/// decrement.
fn block_out(cpu: &mut Cpu, memory: &Memory, port: &mut dyn PortBus, delta: i8) -> u8 {
    let bc = cpu.get_reg16(Reg16::BC, Prefix::None);
    let hl = cpu.get_reg16(Reg16::HL, Prefix::None);
    port.write(bc, memory.read(hl));
    cpu.set_reg16(Reg16::HL, Prefix::None, hl.wrapping_add(delta as i16 as u16));
    let b = cpu.get_reg(Reg8::B).wrapping_sub(1);
    cpu.set_reg(Reg8::B, b);
    block_io_flags(cpu, b);
    b
}

fn block_io_flags(cpu: &mut Cpu, b: u8) {
    let mut flags = cpu.get_flags();
    flags.set(CpuFlags::Z, b == 0);
    flags.insert(CpuFlags::N);
    cpu.set_flags(flags);
}

fn ld_a_ir_flags(cpu: &mut Cpu, val: u8) {
    let (_, iff2) = cpu.get_iffs();
    let mut flags = (cpu.get_flags() & CpuFlags::C) | CpuFlags::sz(val);
    flags.set(CpuFlags::PV, iff2);
    cpu.set_flags(flags);
}

/// Executes one fetched instruction against the machine state.
///
/// The program counter must already point past the instruction; `HALT` and
/// the branching handlers adjust it from there.
pub(crate) fn execute(
    cpu: &mut Cpu,
    memory: &mut Memory,
    port: &mut dyn PortBus,
    flow: &mut Flow,
    inst: &DecodedInstruction,
) {
    dispatch(cpu, memory, port, flow, inst, inst.handler())
}

fn dispatch(
    cpu: &mut Cpu,
    memory: &mut Memory,
    port: &mut dyn PortBus,
    flow: &mut Flow,
    inst: &DecodedInstruction,
    handler: Handler,
) {
    let opcode = inst.opcode;
    match handler {
        Handler::Nop => {}
        Handler::Halt => {
            // loop in place until something external clears the state
            cpu.set_pc(inst.pc);
            cpu.halt();
        }
        Handler::Di => cpu.set_interrupts_enabled(false),
        Handler::Ei => cpu.set_interrupts_enabled(true),
        Handler::Im => {
            let im = match opcode {
                0x46 => InterruptMode::Mode0,
                0x56 => InterruptMode::Mode1,
                _    => InterruptMode::Mode2,
            };
            cpu.set_im(im);
        }
        Handler::LdRR => {
            let val = read_operand8(cpu, memory, inst, opcode);
            write_operand8(cpu, memory, inst, opcode >> 3, val);
        }
        Handler::LdRN => {
            let val = inst.imm8.unwrap_or(0);
            write_operand8(cpu, memory, inst, opcode >> 3, val);
        }
        Handler::LdRpNn => {
            cpu.set_reg16(Reg16::from_op(opcode), inst.prefix, inst.imm16.unwrap_or(0));
        }
        Handler::LdSpHl => {
            cpu.set_sp(cpu.get_index16(inst.prefix));
        }
        Handler::LdARpInd => {
            let addr = cpu.get_reg16(Reg16::from_op(opcode), Prefix::None);
            cpu.set_acc(memory.read(addr));
        }
        Handler::LdRpIndA => {
            let addr = cpu.get_reg16(Reg16::from_op(opcode), Prefix::None);
            memory.write(addr, cpu.get_acc());
        }
        Handler::LdAExt => {
            cpu.set_acc(memory.read(inst.imm16.unwrap_or(0)));
        }
        Handler::LdExtA => {
            memory.write(inst.imm16.unwrap_or(0), cpu.get_acc());
        }
        Handler::LdHlExt => {
            let val = memory.read16(inst.imm16.unwrap_or(0));
            cpu.set_index16(inst.prefix, val);
        }
        Handler::LdExtHl => {
            memory.write16(inst.imm16.unwrap_or(0), cpu.get_index16(inst.prefix));
        }
        Handler::LdRpExt => {
            let val = memory.read16(inst.imm16.unwrap_or(0));
            cpu.set_reg16(Reg16::from_op(opcode), Prefix::None, val);
        }
        Handler::LdExtRp => {
            let val = cpu.get_reg16(Reg16::from_op(opcode), Prefix::None);
            memory.write16(inst.imm16.unwrap_or(0), val);
        }
        Handler::LdAI => {
            let val = cpu.get_i();
            cpu.set_acc(val);
            ld_a_ir_flags(cpu, val);
        }
        Handler::LdAR => {
            let val = cpu.get_r();
            cpu.set_acc(val);
            ld_a_ir_flags(cpu, val);
        }
        Handler::LdIA => cpu.set_i(cpu.get_acc()),
        Handler::LdRA => cpu.set_r(cpu.get_acc()),
        Handler::Push => {
            let val = cpu.get_stk16(StkReg16::from_op(opcode), inst.prefix);
            stack::push(cpu, memory, val);
        }
        Handler::Pop => {
            let val = stack::pop(cpu, memory);
            cpu.set_stk16(StkReg16::from_op(opcode), inst.prefix, val);
        }
        Handler::ExDeHl => cpu.ex_de_hl(),
        Handler::ExAfAf => cpu.ex_af_af(),
        Handler::Exx => cpu.exx(),
        Handler::ExSpHl => {
            let sp = cpu.get_sp();
            let val = memory.read16(sp);
            memory.write16(sp, cpu.get_index16(inst.prefix));
            cpu.set_index16(inst.prefix, val);
        }
        Handler::AluR => {
            let val = read_operand8(cpu, memory, inst, opcode);
            alu8(cpu, Ops8::from_op(opcode), val);
        }
        Handler::AluN => {
            alu8(cpu, Ops8::from_op(opcode), inst.imm8.unwrap_or(0));
        }
        Handler::IncR => {
            let code = opcode >> 3;
            let val = read_operand8(cpu, memory, inst, code);
            let mut flags = cpu.get_flags();
            let res = ops::inc8(val, &mut flags);
            write_operand8(cpu, memory, inst, code, res);
            cpu.set_flags(flags);
        }
        Handler::DecR => {
            let code = opcode >> 3;
            let val = read_operand8(cpu, memory, inst, code);
            let mut flags = cpu.get_flags();
            let res = ops::dec8(val, &mut flags);
            write_operand8(cpu, memory, inst, code, res);
            cpu.set_flags(flags);
        }
        Handler::IncRp => {
            let pair = Reg16::from_op(opcode);
            let val = cpu.get_reg16(pair, inst.prefix).wrapping_add(1);
            cpu.set_reg16(pair, inst.prefix, val);
        }
        Handler::DecRp => {
            let pair = Reg16::from_op(opcode);
            let val = cpu.get_reg16(pair, inst.prefix).wrapping_sub(1);
            cpu.set_reg16(pair, inst.prefix, val);
        }
        Handler::AddHlRp => {
            let val = cpu.get_reg16(Reg16::from_op(opcode), inst.prefix);
            let mut flags = cpu.get_flags();
            let res = ops::add16(cpu.get_index16(inst.prefix), val, &mut flags);
            cpu.set_index16(inst.prefix, res);
            cpu.set_flags(flags);
        }
        Handler::AdcHlRp => {
            let val = cpu.get_reg16(Reg16::from_op(opcode), Prefix::None);
            let mut flags = cpu.get_flags();
            let res = ops::adc16(cpu.get_index16(Prefix::None), val, flags.cf(), &mut flags);
            cpu.set_index16(Prefix::None, res);
            cpu.set_flags(flags);
        }
        Handler::SbcHlRp => {
            let val = cpu.get_reg16(Reg16::from_op(opcode), Prefix::None);
            let mut flags = cpu.get_flags();
            let res = ops::sbc16(cpu.get_index16(Prefix::None), val, flags.cf(), &mut flags);
            cpu.set_index16(Prefix::None, res);
            cpu.set_flags(flags);
        }
        Handler::Daa => {
            let mut flags = cpu.get_flags();
            let res = ops::daa(cpu.get_acc(), &mut flags);
            cpu.set_acc(res);
            cpu.set_flags(flags);
        }
        Handler::Cpl => {
            let mut flags = cpu.get_flags();
            let res = ops::cpl(cpu.get_acc(), &mut flags);
            cpu.set_acc(res);
            cpu.set_flags(flags);
        }
        Handler::Neg => {
            let mut flags = cpu.get_flags();
            let res = ops::sub8(0, cpu.get_acc(), false, &mut flags);
            cpu.set_acc(res);
            cpu.set_flags(flags);
        }
        Handler::Ccf => {
            let mut flags = cpu.get_flags();
            ops::ccf(&mut flags);
            cpu.set_flags(flags);
        }
        Handler::Scf => {
            let mut flags = cpu.get_flags();
            ops::scf(&mut flags);
            cpu.set_flags(flags);
        }
        Handler::Rlca => {
            rotate_acc(cpu, Rot::RLC);
        }
        Handler::Rrca => {
            rotate_acc(cpu, Rot::RRC);
        }
        Handler::Rla => {
            rotate_acc(cpu, Rot::RL);
        }
        Handler::Rra => {
            rotate_acc(cpu, Rot::RR);
        }
        Handler::RotR => {
            if let Some(rot) = Rot::from_op(opcode) {
                let code = opcode & 7;
                let val = read_operand8(cpu, memory, inst, code);
                let mut flags = cpu.get_flags();
                let res = ops::rotate(rot, val, &mut flags);
                write_operand8(cpu, memory, inst, code, res);
                cpu.set_flags(flags);
            }
        }
        Handler::BitB => {
            let val = read_operand8(cpu, memory, inst, opcode);
            let mut flags = cpu.get_flags();
            ops::bit(bit_number(opcode), val, &mut flags);
            cpu.set_flags(flags);
        }
        Handler::ResB => {
            let code = opcode & 7;
            let val = read_operand8(cpu, memory, inst, code);
            write_operand8(cpu, memory, inst, code, ops::res(bit_number(opcode), val));
        }
        Handler::SetB => {
            let code = opcode & 7;
            let val = read_operand8(cpu, memory, inst, code);
            write_operand8(cpu, memory, inst, code, ops::set(bit_number(opcode), val));
        }
        Handler::Rld => {
            let hl = cpu.get_reg16(Reg16::HL, Prefix::None);
            let acc = cpu.get_acc();
            let val = memory.read(hl);
            memory.write(hl, (val << 4) | (acc & 0x0F));
            let acc = (acc & 0xF0) | (val >> 4);
            cpu.set_acc(acc);
            rld_rrd_flags(cpu, acc);
        }
        Handler::Rrd => {
            let hl = cpu.get_reg16(Reg16::HL, Prefix::None);
            let acc = cpu.get_acc();
            let val = memory.read(hl);
            memory.write(hl, (acc << 4) | (val >> 4));
            let acc = (acc & 0xF0) | (val & 0x0F);
            cpu.set_acc(acc);
            rld_rrd_flags(cpu, acc);
        }
        Handler::JpNn => {
            cpu.set_pc(inst.imm16.unwrap_or(0));
        }
        Handler::JpCcNn => {
            if cpu.evaluate_condition(Condition::from_op(opcode)) {
                cpu.set_pc(inst.imm16.unwrap_or(0));
            }
        }
        Handler::JrE => {
            jump_relative(cpu, inst.disp.unwrap_or(0));
        }
        Handler::JrCcE => {
            if cpu.evaluate_condition(Condition::from_jr(opcode)) {
                jump_relative(cpu, inst.disp.unwrap_or(0));
            }
        }
        Handler::JpHlInd => {
            cpu.set_pc(cpu.get_index16(inst.prefix));
        }
        Handler::Djnz => {
            let b = cpu.get_reg(Reg8::B).wrapping_sub(1);
            cpu.set_reg(Reg8::B, b);
            if b != 0 {
                jump_relative(cpu, inst.disp.unwrap_or(0));
            }
        }
        Handler::CallNn => {
            call(cpu, memory, flow, inst.imm16.unwrap_or(0));
        }
        Handler::CallCcNn => {
            if cpu.evaluate_condition(Condition::from_op(opcode)) {
                call(cpu, memory, flow, inst.imm16.unwrap_or(0));
            }
        }
        Handler::Ret => {
            ret(cpu, memory, flow);
        }
        Handler::RetCc => {
            if cpu.evaluate_condition(Condition::from_op(opcode)) {
                ret(cpu, memory, flow);
            }
        }
        Handler::Reti => {
            ret(cpu, memory, flow);
        }
        Handler::Retn => {
            ret(cpu, memory, flow);
            cpu.restore_iff1();
        }
        Handler::Rst => {
            let target = restart_target(opcode);
            let ret_pc = cpu.get_pc();
            stack::push(cpu, memory, ret_pc);
            cpu.set_pc(target);
        }
        Handler::InAN => {
            let addr = u16::from_be_bytes([cpu.get_acc(), inst.imm8.unwrap_or(0)]);
            let val = port.read(addr);
            cpu.set_acc(val);
        }
        Handler::OutNA => {
            let addr = u16::from_be_bytes([cpu.get_acc(), inst.imm8.unwrap_or(0)]);
            port.write(addr, cpu.get_acc());
        }
        Handler::InRC => {
            let val = port.read(cpu.get_reg16(Reg16::BC, Prefix::None));
            let mut flags = cpu.get_flags();
            ops::input_flags(val, &mut flags);
            cpu.set_flags(flags);
            if let Some(reg) = Reg8::from_code(opcode >> 3) {
                cpu.set_reg(reg, val);
            }
        }
        Handler::OutCR => {
            let addr = cpu.get_reg16(Reg16::BC, Prefix::None);
            let val = read_operand8(cpu, memory, inst, opcode >> 3);
            port.write(addr, val);
        }
        Handler::Ldi => {
            block_load(cpu, memory, 1);
        }
        Handler::Ldd => {
            block_load(cpu, memory, -1);
        }
        Handler::Ldir => {
            // runs to completion in one dispatch, unlike interrupt-accurate hardware
            while block_load(cpu, memory, 1) != 0 {}
            clear_pv(cpu);
        }
        Handler::Lddr => {
            while block_load(cpu, memory, -1) != 0 {}
            clear_pv(cpu);
        }
        Handler::Cpi => {
            block_compare(cpu, memory, 1);
        }
        Handler::Cpd => {
            block_compare(cpu, memory, -1);
        }
        Handler::Cpir => {
            while block_compare(cpu, memory, 1) != 0 && !cpu.get_flags().zf() {}
        }
        Handler::Cpdr => {
            while block_compare(cpu, memory, -1) != 0 && !cpu.get_flags().zf() {}
        }
        Handler::Ini => {
            block_in(cpu, memory, port, 1);
        }
        Handler::Ind => {
            block_in(cpu, memory, port, -1);
        }
        Handler::Inir => {
            while block_in(cpu, memory, port, 1) != 0 {}
        }
        Handler::Indr => {
            while block_in(cpu, memory, port, -1) != 0 {}
        }
        Handler::Outi => {
            block_out(cpu, memory, port, 1);
        }
        Handler::Outd => {
            block_out(cpu, memory, port, -1);
        }
        Handler::Otir => {
            while block_out(cpu, memory, port, 1) != 0 {}
        }
        Handler::Otdr => {
            while block_out(cpu, memory, port, -1) != 0 {}
        }
        Handler::IxIyIndirect => {
            let table = if inst.prefix.is_index_bit_ops() {
                &tables::CB
            }
            else {
                &tables::MAIN
            };
            if let Some(entry) = &table[opcode as usize] {
                dispatch(cpu, memory, port, flow, inst, entry.handler);
            }
        }
    }
}

fn rotate_acc(cpu: &mut Cpu, op: Rot) {
    let mut flags = cpu.get_flags();
    let res = ops::rotate_acc(op, cpu.get_acc(), &mut flags);
    cpu.set_acc(res);
    cpu.set_flags(flags);
}

fn rld_rrd_flags(cpu: &mut Cpu, acc: u8) {
    let flags = (cpu.get_flags() & CpuFlags::C) | CpuFlags::szp(acc);
    cpu.set_flags(flags);
}

fn clear_pv(cpu: &mut Cpu) {
    let mut flags = cpu.get_flags();
    flags.remove(CpuFlags::PV);
    cpu.set_flags(flags);
}
