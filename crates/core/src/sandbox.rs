//! Process hardening: a seccomp allow-list installed before pages are
//! extracted. Any system call outside the list kills the process.

use crate::error::{ExtractError, Result};

/// Whether [`install_syscall_filter`] can work on this platform.
pub const AVAILABLE: bool = cfg!(all(target_os = "linux", target_arch = "x86_64"));

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
mod filter {
    use libc::{c_long, c_ulong, sock_filter, sock_fprog};

    // classic BPF opcodes
    const BPF_LD_W_ABS: u16 = 0x20;
    const BPF_JEQ_K: u16 = 0x15;
    const BPF_RET_K: u16 = 0x06;

    const SECCOMP_MODE_FILTER: c_ulong = 2;
    // kills every thread, not only the caller
    const SECCOMP_RET_KILL_PROCESS: u32 = 0x8000_0000;
    const SECCOMP_RET_ALLOW: u32 = 0x7fff_0000;
    const AUDIT_ARCH_X86_64: u32 = 0xc000_003e;

    // offsets into struct seccomp_data
    const NR_OFFSET: u32 = 0;
    const ARCH_OFFSET: u32 = 4;

    pub(super) const ALLOWED: &[c_long] = &[
        libc::SYS_open,
        libc::SYS_openat,
        libc::SYS_close,
        libc::SYS_read,
        libc::SYS_pread64,
        libc::SYS_futex,
        libc::SYS_time,
        libc::SYS_gettimeofday,
        libc::SYS_clock_gettime,
        libc::SYS_fstat,
        // std checks descriptors with F_GETFD before closing them in debug builds
        libc::SYS_fcntl,
        libc::SYS_newfstatat,
        libc::SYS_mmap,
        libc::SYS_munmap,
        libc::SYS_mremap,
        libc::SYS_madvise,
        libc::SYS_lseek,
        libc::SYS_write,
        libc::SYS_brk,
        libc::SYS_sigaltstack,
        libc::SYS_rt_sigreturn,
        libc::SYS_exit,
        libc::SYS_exit_group,
    ];

    const fn stmt(code: u16, k: u32) -> sock_filter {
        sock_filter {
            code,
            jt: 0,
            jf: 0,
            k,
        }
    }

    const fn jump(code: u16, k: u32, jt: u8, jf: u8) -> sock_filter {
        sock_filter { code, jt, jf, k }
    }

    /// The filter program: check the architecture, then compare the call
    /// number against each allowed entry.
    pub(super) fn program() -> Vec<sock_filter> {
        let mut prog = vec![
            stmt(BPF_LD_W_ABS, ARCH_OFFSET),
            jump(BPF_JEQ_K, AUDIT_ARCH_X86_64, 1, 0),
            stmt(BPF_RET_K, SECCOMP_RET_KILL_PROCESS),
            stmt(BPF_LD_W_ABS, NR_OFFSET),
        ];
        for &nr in ALLOWED {
            prog.push(jump(BPF_JEQ_K, nr as u32, 0, 1));
            prog.push(stmt(BPF_RET_K, SECCOMP_RET_ALLOW));
        }
        prog.push(stmt(BPF_RET_K, SECCOMP_RET_KILL_PROCESS));
        prog
    }

    pub(super) fn install() -> Result<(), String> {
        let mut prog = program();
        let len = u16::try_from(prog.len()).map_err(|_| "filter program too long".to_string())?;
        let fprog = sock_fprog {
            len,
            filter: prog.as_mut_ptr(),
        };
        // SAFETY: plain prctl calls; `fprog` points at `prog`, which outlives
        // both calls, and the kernel copies the program on install.
        unsafe {
            if libc::prctl(libc::PR_SET_NO_NEW_PRIVS, 1 as c_ulong, 0 as c_ulong, 0 as c_ulong, 0 as c_ulong) != 0 {
                return Err(format!("PR_SET_NO_NEW_PRIVS: {}", std::io::Error::last_os_error()));
            }
            if libc::prctl(
                libc::PR_SET_SECCOMP,
                SECCOMP_MODE_FILTER,
                &fprog as *const sock_fprog as c_ulong,
                0 as c_ulong,
                0 as c_ulong,
            ) != 0
            {
                return Err(format!("PR_SET_SECCOMP: {}", std::io::Error::last_os_error()));
            }
        }
        Ok(())
    }
}

/// Restricts the process to the system calls needed to read the already
/// loaded document and write records. Irreversible.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub fn install_syscall_filter() -> Result<()> {
    filter::install().map_err(ExtractError::Sandbox)?;
    tracing::debug!(allowed = filter::ALLOWED.len(), "syscall filter installed");
    Ok(())
}

#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
pub fn install_syscall_filter() -> Result<()> {
    Err(ExtractError::Sandbox(
        "syscall filtering is only available on linux x86_64".to_string(),
    ))
}
