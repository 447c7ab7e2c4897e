/// Served at `/assets/site.css`. Covers the public page and the admin panel.
pub const STYLESHEET: &str = r#":root {
  --dark: #0f172a;
  --darker: #020617;
  --primary: #3b82f6;
  --secondary: #8b5cf6;
  --text: #e2e8f0;
  --muted: #94a3b8;
  --success: #22c55e;
  --danger: #ef4444;
}

* { box-sizing: border-box; }

html { scroll-behavior: smooth; scroll-padding-top: 80px; }

body {
  margin: 0;
  font-family: "Inter", system-ui, sans-serif;
  background: var(--darker);
  color: var(--text);
  line-height: 1.6;
}

a { color: var(--primary); }

.button {
  display: inline-block;
  padding: 0.6rem 1.4rem;
  border: 0;
  border-radius: 0.5rem;
  background: linear-gradient(90deg, var(--primary), var(--secondary));
  color: #fff;
  font: inherit;
  text-decoration: none;
  cursor: pointer;
}

/* scroll progress */
.scroll-progress {
  position: fixed;
  top: 0;
  left: 0;
  height: 3px;
  width: 100%;
  z-index: 60;
  background: linear-gradient(90deg, var(--primary), var(--secondary));
  transform-origin: 0 50%;
  animation: grow-progress linear both;
  animation-timeline: scroll(root);
}

@keyframes grow-progress {
  from { transform: scaleX(0); }
  to { transform: scaleX(1); }
}

/* header and mobile menu */
.site-header {
  position: sticky;
  top: 0;
  z-index: 50;
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 1rem 2rem;
  background: rgba(2, 6, 23, 0.9);
  backdrop-filter: blur(8px);
}

.brand { color: var(--text); font-weight: 700; text-decoration: none; }

.site-nav a { margin-left: 1.5rem; color: var(--text); text-decoration: none; }
.site-nav a:hover { color: var(--primary); }

.menu-open, .menu-close { display: none; font-size: 1.5rem; text-decoration: none; color: var(--text); }

@media (max-width: 767px) {
  .menu-open { display: block; }
  .site-nav { display: none; }
  .site-nav:target {
    display: flex;
    flex-direction: column;
    position: absolute;
    top: 100%;
    left: 0;
    right: 0;
    padding: 1rem 2rem;
    background: var(--dark);
  }
  .site-nav:target a { margin: 0.5rem 0; }
  .site-nav:target .menu-close { display: block; align-self: flex-end; }
}

/* sections */
main section { max-width: 64rem; margin: 0 auto; padding: 5rem 2rem; }

.hero h1 { font-size: 3rem; margin: 0; }
.hero h2 { color: var(--muted); font-weight: 400; }

.reveal {
  animation: fade-in-up linear both;
  animation-timeline: view();
  animation-range: entry 10% cover 30%;
}

@keyframes fade-in-up {
  from { opacity: 0; transform: translateY(20px); }
  to { opacity: 1; transform: translateY(0); }
}

.counters { display: grid; grid-template-columns: repeat(auto-fit, minmax(10rem, 1fr)); gap: 1.5rem; }
.stat-card { padding: 1.5rem; border-radius: 0.75rem; background: var(--dark); text-align: center; }
.counter, .counter-suffix { font-size: 2.5rem; font-weight: 700; color: var(--primary); }
.counter { display: inline-block; animation: count-in 2s ease-out both; }

@keyframes count-in {
  from { opacity: 0; transform: scale(0.5); }
  to { opacity: 1; transform: scale(1); }
}

.project-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(16rem, 1fr)); gap: 1.5rem; }
.project-card { padding: 1.5rem; border-radius: 0.75rem; background: var(--dark); }

.contact-form { display: grid; gap: 0.75rem; max-width: 36rem; }
.contact-form input, .contact-form textarea, .login-form input {
  width: 100%;
  padding: 0.6rem 0.8rem;
  border: 1px solid #334155;
  border-radius: 0.5rem;
  background: var(--dark);
  color: var(--text);
  font: inherit;
}

.site-footer { padding: 2rem; text-align: center; color: var(--muted); }

/* toast */
.toast {
  position: fixed;
  top: 1.25rem;
  right: 1.25rem;
  z-index: 70;
  padding: 0.75rem 1.5rem;
  border-radius: 0.5rem;
  color: #fff;
  box-shadow: 0 10px 25px rgba(0, 0, 0, 0.4);
  animation: toast-out 0.3s ease-in var(--toast-duration, 3s) forwards;
}
.toast-success { background: var(--success); }
.toast-error { background: var(--danger); }

@keyframes toast-out {
  to { transform: translateX(calc(100% + 2rem)); visibility: hidden; }
}

/* admin */
.admin { background: var(--dark); }
.inline { display: inline; }

.login-container { max-width: 24rem; margin: 10vh auto; padding: 2rem; border-radius: 0.75rem; background: var(--darker); }
.login-form { display: grid; gap: 0.75rem; }
.login-error { color: var(--danger); }
.button-google { margin-top: 1rem; width: 100%; text-align: center; background: #fff; color: #1f2937; }

.admin-header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: var(--darker); }
.admin-panel { padding: 2rem; }

.banner { display: flex; gap: 1rem; align-items: center; padding: 0.75rem 1rem; margin-bottom: 1rem; border-radius: 0.5rem; }
.banner-error { background: rgba(239, 68, 68, 0.15); border: 1px solid var(--danger); }

.stats { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.stat { flex: 1; padding: 1rem; border-radius: 0.75rem; background: var(--darker); }
.stat-label { display: block; color: var(--muted); }
.stat-value { font-size: 2rem; font-weight: 700; }

table.messages { width: 100%; border-collapse: collapse; }
table.messages th, table.messages td { padding: 0.6rem; text-align: left; border-bottom: 1px solid #1e293b; }
.message-row.unread { background: rgba(59, 130, 246, 0.08); }
.badge { padding: 0.15rem 0.6rem; border-radius: 999px; font-size: 0.8rem; }
.badge-new { background: var(--primary); color: #fff; }
.badge-read { background: #334155; color: var(--muted); }
.placeholder { padding: 3rem; text-align: center; color: var(--muted); }

.overlay { position: fixed; inset: 0; z-index: 80; display: grid; place-items: center; }
.overlay-backdrop, .backdrop-hit { position: absolute; inset: 0; width: 100%; height: 100%; border: 0; background: rgba(0, 0, 0, 0.6); cursor: pointer; }
.overlay-content { position: relative; max-width: 40rem; width: 90%; padding: 2rem; border-radius: 0.75rem; background: var(--darker); }
.overlay-close { position: absolute; top: 1rem; right: 1rem; }
.message-body { white-space: pre-wrap; }

.alert-backdrop { position: fixed; inset: 0; z-index: 90; display: grid; place-items: center; background: rgba(0, 0, 0, 0.6); }
.alert { padding: 1.5rem 2rem; border-radius: 0.75rem; background: var(--darker); border: 1px solid var(--danger); }
"#;
